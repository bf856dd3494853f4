//! timbre-rs: Voice cloning client.
//!
//! This crate captures or loads a reference voice sample, sends it with the
//! text to speak to a voice cloning server, and reports where the
//! synthesized audio can be fetched.

pub mod backend;
pub mod blob;
pub mod capture;
pub mod cli;
pub mod language;
pub mod prefs;
pub mod recorder;
