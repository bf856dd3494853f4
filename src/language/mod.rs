//! The fixed set of synthesis languages.

mod list;

pub use list::{Language, LanguageParseError};
