//! Audio capture devices.
//!
//! The recorder talks to the microphone only through these traits, so
//! tests can substitute a fake device and stream.

mod device;
mod types;

pub use device::{CpalDevice, CpalStream};
pub use types::{AudioChunk, CaptureConstraints, CaptureError};

/// Source of live audio streams.
#[cfg_attr(test, mockall::automock)]
pub trait CaptureDevice {
    /// Request exclusive access to an input stream.
    ///
    /// Fails with [`CaptureError::AccessDenied`] if the device is missing
    /// or the request is refused.
    fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// A live input stream owned by one recording session.
pub trait CaptureStream {
    /// Begin delivering audio.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Chunks that became available since the last poll.
    fn poll_chunks(&mut self) -> Vec<AudioChunk> {
        Vec::new()
    }

    /// Halt capture and return whatever the device flushes on stop.
    fn stop(&mut self) -> Result<Vec<AudioChunk>, CaptureError>;

    /// Give the device back. Must be safe to call more than once.
    fn release(&mut self);

    /// MIME type of the chunks this stream produces.
    fn mime_type(&self) -> &str;
}
