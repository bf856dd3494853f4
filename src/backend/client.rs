//! HTTP client for backend communication.

use reqwest::Url;

use super::Backend;
use super::types::{
    BackendError, CloneRequest, CloneResponse, ErrorResponse, REFERENCE_FILE_NAME,
};

/// HTTP-based backend client.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    /// Create a new HTTP backend client for the given server root.
    pub fn new(server: &str) -> Self {
        Self {
            base_url: server.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Get the base URL for this backend.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a possibly relative audio URL against the server root.
    pub fn resolve_url(&self, audio_url: &str) -> Result<String, BackendError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| BackendError::InvalidResponse(format!("Bad server URL: {e}")))?;

        base.join(audio_url)
            .map(String::from)
            .map_err(|e| BackendError::InvalidResponse(format!("Bad audio URL: {e}")))
    }
}

impl Backend for HttpBackend {
    fn clone_voice(&self, request: &CloneRequest) -> Result<CloneResponse, BackendError> {
        let url = format!("{}/clone", self.base_url);

        let audio_part = reqwest::blocking::multipart::Part::bytes(request.audio.clone())
            .file_name(REFERENCE_FILE_NAME)
            .mime_str(&request.mime_type)
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let form = reqwest::blocking::multipart::Form::new()
            .part("reference_audio", audio_part)
            .text("text", request.text.clone())
            .text("language", request.language.name());

        log::info!(
            "POST {url} ({} bytes of {}, language {})",
            request.audio.len(),
            request.mime_type,
            request.language
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            log::warn!("clone request failed with status {status}");
            return Err(BackendError::Server {
                status: status.as_u16(),
                message: ErrorResponse::message_from_body(&body),
            });
        }

        let parsed: CloneResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        if parsed.audio_url.trim().is_empty() {
            return Err(BackendError::InvalidResponse(
                "Empty audio_url in response".to_string(),
            ));
        }

        Ok(CloneResponse {
            audio_url: self.resolve_url(&parsed.audio_url)?,
        })
    }

    fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, BackendError> {
        let url = self.resolve_url(url)?;
        log::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Server {
                status: status.as_u16(),
                message: format!("Download failed: {status}"),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}
