//! CLI argument parsing, validation and terminal rendering.

mod args;
mod terminal;

pub use args::{Args, ArgsError};
pub use terminal::TerminalView;
