//! HttpBackend against a local mock server.

use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::json;

use timbre_rs::backend::{
    Backend, BackendError, CloneRequest, FALLBACK_ERROR_MESSAGE, HttpBackend,
};
use timbre_rs::blob::{AudioBlob, UploadedFile};
use timbre_rs::capture::{CaptureConstraints, CaptureDevice, CaptureError, CaptureStream};
use timbre_rs::language::Language;
use timbre_rs::recorder::{CloneController, RecorderView, StatusView, View};

fn request() -> CloneRequest {
    CloneRequest::new(b"RIFFfakewav".to_vec(), "Hello world")
}

#[test]
fn test_clone_sends_multipart_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/clone")
            .body_contains("name=\"reference_audio\"")
            .body_contains("filename=\"reference.audio\"")
            .body_contains("RIFFfakewav")
            .body_contains("name=\"text\"")
            .body_contains("Hello world")
            .body_contains("name=\"language\"")
            .body_contains("Spanish");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"audio_url": "https://x/y.mp3"}));
    });

    let backend = HttpBackend::new(&server.base_url());
    let response = backend
        .clone_voice(&request().with_language(Language::Spanish))
        .unwrap();

    mock.assert();
    assert_eq!(response.audio_url, "https://x/y.mp3");
}

#[test]
fn test_clone_sends_audio_mime_type() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/clone")
            .body_contains("filename=\"reference.audio\"")
            .body_contains("audio/mpeg");
        then.status(200)
            .json_body(json!({"audio_url": "https://x/y.mp3"}));
    });

    let backend = HttpBackend::new(&server.base_url());
    backend
        .clone_voice(&request().with_mime_type("audio/mpeg"))
        .unwrap();

    mock.assert();
}

#[test]
fn test_clone_rejects_invalid_mime_type() {
    let backend = HttpBackend::new("http://127.0.0.1:1");
    let result = backend.clone_voice(&request().with_mime_type("not a mime"));

    assert!(matches!(result, Err(BackendError::RequestFailed(_))));
}

#[test]
fn test_clone_rejects_empty_audio_url() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/clone");
        then.status(200).json_body(json!({"audio_url": ""}));
    });

    let backend = HttpBackend::new(&server.base_url());

    assert!(matches!(
        backend.clone_voice(&request()),
        Err(BackendError::InvalidResponse(_))
    ));
}

#[test]
fn test_clone_rejects_blank_audio_url() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/clone");
        then.status(200).json_body(json!({"audio_url": "   "}));
    });

    let backend = HttpBackend::new(&server.base_url());

    assert!(matches!(
        backend.clone_voice(&request()),
        Err(BackendError::InvalidResponse(_))
    ));
}

#[test]
fn test_clone_resolves_relative_url() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/clone");
        then.status(200)
            .json_body(json!({"audio_url": "/output/tmp_1a2b.wav"}));
    });

    let backend = HttpBackend::new(&server.base_url());
    let response = backend.clone_voice(&request()).unwrap();

    assert_eq!(
        response.audio_url,
        format!("{}/output/tmp_1a2b.wav", server.base_url())
    );
}

#[test]
fn test_clone_server_error_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/clone");
        then.status(500)
            .json_body(json!({"error": "synthesis failed"}));
    });

    let backend = HttpBackend::new(&server.base_url());
    let result = backend.clone_voice(&request());

    match result {
        Err(BackendError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "synthesis failed");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_clone_server_error_without_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/clone");
        then.status(500);
    });

    let backend = HttpBackend::new(&server.base_url());
    let result = backend.clone_voice(&request());

    assert!(matches!(
        result,
        Err(BackendError::Server { status: 500, ref message }) if message == FALLBACK_ERROR_MESSAGE
    ));
}

#[test]
fn test_clone_malformed_success_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/clone");
        then.status(200).body("not json");
    });

    let backend = HttpBackend::new(&server.base_url());
    let result = backend.clone_voice(&request());

    assert!(matches!(result, Err(BackendError::InvalidResponse(_))));
}

#[test]
fn test_clone_connection_refused() {
    let backend = HttpBackend::new("http://127.0.0.1:1");
    let result = backend.clone_voice(&request());

    assert!(matches!(result, Err(BackendError::ConnectionFailed(_))));
}

#[test]
fn test_fetch_audio() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/output/tmp_1a2b.wav");
        then.status(200).body("RIFF synthesized");
    });

    let backend = HttpBackend::new(&server.base_url());
    let audio = backend.fetch_audio("/output/tmp_1a2b.wav").unwrap();

    assert_eq!(audio, b"RIFF synthesized");
}

#[test]
fn test_fetch_audio_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/output/missing.wav");
        then.status(404);
    });

    let backend = HttpBackend::new(&server.base_url());
    let result = backend.fetch_audio("/output/missing.wav");

    assert!(matches!(result, Err(BackendError::Server { status: 404, .. })));
}

// ===========================================
// Controller end to end over HTTP
// ===========================================

struct NoDevice;

impl CaptureDevice for NoDevice {
    fn acquire(
        &self,
        _constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, CaptureError> {
        Err(CaptureError::AccessDenied("no microphone".to_string()))
    }
}

#[derive(Default)]
struct StatusLog(Vec<StatusView>);

impl View for StatusLog {
    fn render_recorder(&mut self, _view: &RecorderView) {}

    fn render_status(&mut self, status: &StatusView) {
        self.0.push(status.clone());
    }

    fn set_upload_enabled(&mut self, _enabled: bool) {}

    fn set_recorder_enabled(&mut self, _enabled: bool) {}

    fn set_submit_enabled(&mut self, _enabled: bool) {}
}

fn uploaded_sample() -> UploadedFile {
    UploadedFile {
        blob: AudioBlob::new(b"RIFFfakewav".to_vec(), "audio/wav").unwrap(),
        filename: "voice.wav".to_string(),
    }
}

#[test]
fn test_controller_submit_over_http() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/clone").body_contains("English");
        then.status(200)
            .json_body(json!({"audio_url": "https://x/y.mp3"}));
    });

    let backend = HttpBackend::new(&server.base_url());
    let mut controller = CloneController::new(backend, NoDevice, StatusLog::default());
    controller.attach_upload(uploaded_sample()).unwrap();
    controller.set_text("Hello world");

    let url = controller.submit().unwrap();

    mock.assert();
    assert_eq!(url, "https://x/y.mp3");
    assert!(matches!(
        controller.view().0.as_slice(),
        [
            StatusView::Idle,
            StatusView::Loading { .. },
            StatusView::Success { .. }
        ]
    ));
}

#[test]
fn test_controller_server_error_over_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/clone");
        then.status(500)
            .json_body(json!({"error": "synthesis failed"}));
    });

    let backend = HttpBackend::new(&server.base_url());
    let mut controller = CloneController::new(backend, NoDevice, StatusLog::default());
    controller.attach_upload(uploaded_sample()).unwrap();
    controller.set_text("Hello world");

    assert!(controller.submit().is_err());
    assert_eq!(
        controller.status(),
        &StatusView::Error {
            message: "synthesis failed".to_string()
        }
    );
}
