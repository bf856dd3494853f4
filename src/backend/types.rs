//! Backend request/response types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::Language;

/// Filename attached to the reference audio part of the upload.
pub const REFERENCE_FILE_NAME: &str = "reference.audio";

/// MIME type sent when the audio's format is unknown.
pub const DEFAULT_AUDIO_MIME: &str = "application/octet-stream";

/// Message used when the server fails without saying why.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Errors that can occur when communicating with the backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A voice cloning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    /// Reference audio bytes, never empty.
    pub audio: Vec<u8>,
    /// MIME type of `audio`.
    pub mime_type: String,
    /// Text to speak, sent as typed.
    pub text: String,
    pub language: Language,
}

impl CloneRequest {
    /// Create a new request in the default language.
    pub fn new(audio: Vec<u8>, text: impl Into<String>) -> Self {
        Self {
            audio,
            mime_type: DEFAULT_AUDIO_MIME.to_string(),
            text: text.into(),
            language: Language::default(),
        }
    }

    /// Set the MIME type of the audio.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Set the synthesis language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

/// Successful response from `POST /clone`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloneResponse {
    pub audio_url: String,
}

/// Error body the server may attach to a failed response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// Pull a usable message out of a failed response body.
    ///
    /// Falls back to [`FALLBACK_ERROR_MESSAGE`] when the body is empty, not
    /// JSON, or carries no `error` text.
    pub fn message_from_body(body: &str) -> String {
        serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_request_builder() {
        let request = CloneRequest::new(b"RIFF".to_vec(), "Hello world")
            .with_mime_type("audio/wav")
            .with_language(Language::German);

        assert_eq!(request.audio, b"RIFF");
        assert_eq!(request.mime_type, "audio/wav");
        assert_eq!(request.text, "Hello world");
        assert_eq!(request.language, Language::German);
    }

    #[test]
    fn test_clone_request_defaults_to_english() {
        let request = CloneRequest::new(b"RIFF".to_vec(), "Hello");
        assert_eq!(request.language, Language::English);
        assert_eq!(request.mime_type, DEFAULT_AUDIO_MIME);
    }

    #[test]
    fn test_clone_response_deserialize() {
        let json = r#"{"audio_url": "/output/tmp_abc.wav"}"#;

        let response: CloneResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.audio_url, "/output/tmp_abc.wav");
    }

    #[test]
    fn test_error_message_from_body() {
        let message = ErrorResponse::message_from_body(r#"{"error": "synthesis failed"}"#);
        assert_eq!(message, "synthesis failed");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(ErrorResponse::message_from_body(""), FALLBACK_ERROR_MESSAGE);
        assert_eq!(ErrorResponse::message_from_body("{}"), FALLBACK_ERROR_MESSAGE);
        assert_eq!(
            ErrorResponse::message_from_body(r#"{"error": ""}"#),
            FALLBACK_ERROR_MESSAGE
        );
        assert_eq!(
            ErrorResponse::message_from_body("<html>Internal Server Error</html>"),
            FALLBACK_ERROR_MESSAGE
        );
    }
}
