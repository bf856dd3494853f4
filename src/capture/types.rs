//! Capture request/response types.

use thiserror::Error;

/// A block of encoded audio delivered by a capture stream.
pub type AudioChunk = Vec<u8>;

/// Errors that can occur while acquiring or driving a capture device.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Device access denied: {0}")]
    AccessDenied(String),

    #[error("Unsupported device configuration: {0}")]
    Unsupported(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// What the caller asks of the input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Preferred sample rate; the device default is used when `None`.
    pub sample_rate: Option<u32>,
    /// Downmix to a single channel.
    pub mono: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            sample_rate: None,
            mono: true,
        }
    }
}
