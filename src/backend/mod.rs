//! Backend communication with the voice cloning server.
//!
//! Provides the trait and HTTP implementation for the server's
//! `POST /clone` endpoint.

mod client;
mod types;

pub use client::HttpBackend;
pub use types::{
    BackendError, CloneRequest, CloneResponse, DEFAULT_AUDIO_MIME, ErrorResponse,
    FALLBACK_ERROR_MESSAGE, REFERENCE_FILE_NAME,
};

/// Default address of a locally running cloning server.
pub const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Trait for voice cloning backend communication.
///
/// This trait abstracts the HTTP communication with the server,
/// allowing for mock implementations in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Backend: Send + Sync {
    /// Submit reference audio and text for synthesis.
    ///
    /// # Returns
    /// The URL of the synthesized audio. Relative URLs returned by the
    /// server are resolved against the server root.
    fn clone_voice(&self, request: &CloneRequest) -> Result<CloneResponse, BackendError>;

    /// Download synthesized audio.
    fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, BackendError>;
}

/// Create a backend for the given server address.
pub fn create_backend(server: &str) -> HttpBackend {
    HttpBackend::new(server)
}
