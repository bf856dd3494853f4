//! CLI argument definitions and parsing.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::backend::DEFAULT_SERVER;
use crate::language::Language;

/// Clone a voice from a reference sample and speak new text with it.
#[derive(Parser, Debug)]
#[command(name = "timbre-rs")]
#[command(about = "Voice cloning client: record or upload a reference sample, then synthesize text")]
#[command(version)]
pub struct Args {
    /// Cloning server address
    #[arg(long, env = "TIMBRE_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Reference audio file to upload (takes precedence over a recording)
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Record the reference sample from the default microphone
    #[arg(long)]
    pub record: bool,

    /// Stop recording automatically after this many seconds
    #[arg(long, value_name = "SECS")]
    pub record_secs: Option<u64>,

    /// Capture sample rate in Hz (device default if omitted)
    #[arg(long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Directory to save the recorded sample in
    #[arg(long, value_name = "DIR")]
    pub save_recording: Option<PathBuf>,

    /// Text to synthesize in the cloned voice
    #[arg(short, long)]
    pub text: Option<String>,

    /// Synthesis language (name or code)
    #[arg(short, long, default_value = "English")]
    pub language: Language,

    /// Download the synthesized audio to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List supported languages
    #[arg(long)]
    pub list_languages: bool,

    /// Switch between the light and dark theme
    #[arg(long)]
    pub toggle_theme: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Argument combinations that parse but make no sense together.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgsError {
    #[error("{0} requires --record")]
    RequiresRecord(&'static str),

    #[error("--record-secs must be at least 1")]
    ZeroDuration,

    #[error("--record and --reference are mutually exclusive; pick one audio source")]
    ConflictingSources,
}

impl Args {
    /// Check cross-argument constraints clap cannot express.
    pub fn validate(&self) -> Result<(), ArgsError> {
        if !self.record {
            if self.record_secs.is_some() {
                return Err(ArgsError::RequiresRecord("--record-secs"));
            }
            if self.save_recording.is_some() {
                return Err(ArgsError::RequiresRecord("--save-recording"));
            }
            if self.sample_rate.is_some() {
                return Err(ArgsError::RequiresRecord("--sample-rate"));
            }
        } else if self.reference.is_some() {
            return Err(ArgsError::ConflictingSources);
        }

        if self.record_secs == Some(0) {
            return Err(ArgsError::ZeroDuration);
        }

        Ok(())
    }

    /// Filter string for env_logger.
    pub fn log_filter(&self) -> &str {
        match &self.log_level {
            Some(level) => level,
            None if self.verbose => "debug",
            None => "warn",
        }
    }
}
