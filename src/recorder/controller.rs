//! The recording/upload controller.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::backend::{Backend, BackendError, CloneRequest};
use crate::blob::{AudioBlob, ObjectUrlRegistry, UploadedFile};
use crate::capture::{AudioChunk, CaptureConstraints, CaptureDevice};
use crate::language::Language;

use super::View;
use super::state::{
    DEVICE_DENIED_NOTICE, EMPTY_CAPTURE_MESSAGE, FinishedClip, LOADING_MESSAGE,
    RECORDING_FILE_NAME, RecorderPhase, RecorderState, RecorderView, RecordingSession, StatusView,
    format_timer,
};

/// Errors surfaced by controller actions.
///
/// All of them are recoverable by the user retrying the action.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Please upload or record an audio file first.")]
    MissingAudio,

    #[error("Please enter some text to synthesize.")]
    MissingText,

    #[error("Microphone access denied: {0}")]
    DeviceAccessDenied(String),

    #[error("Recording failed. No audio captured.")]
    EmptyCapture,

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Transport(String),

    #[error("Another audio source is active")]
    SourceLocked,

    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        phase: RecorderPhase,
        action: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BackendError> for ControllerError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Server { message, .. } => ControllerError::Server(message),
            other => ControllerError::Transport(other.to_string()),
        }
    }
}

/// The audio that would be submitted right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSource<'a> {
    None,
    UploadedFile {
        blob: &'a AudioBlob,
        filename: &'a str,
    },
    RecordedClip(&'a AudioBlob),
}

impl<'a> AudioSource<'a> {
    pub fn blob(&self) -> Option<&'a AudioBlob> {
        match *self {
            AudioSource::None => None,
            AudioSource::UploadedFile { blob, .. } => Some(blob),
            AudioSource::RecordedClip(blob) => Some(blob),
        }
    }
}

/// Owns the recorder state machine, the chosen audio source and the form
/// fields, and drives the view through every transition.
pub struct CloneController<B: Backend, D: CaptureDevice, V: View> {
    backend: B,
    device: D,
    view: V,
    constraints: CaptureConstraints,
    state: RecorderState,
    upload: Option<UploadedFile>,
    text: String,
    language: Language,
    status: StatusView,
    urls: ObjectUrlRegistry,
}

impl<B: Backend, D: CaptureDevice, V: View> CloneController<B, D, V> {
    /// Create a controller and render its initial views.
    pub fn new(backend: B, device: D, view: V) -> Self {
        let mut controller = Self {
            backend,
            device,
            view,
            constraints: CaptureConstraints::default(),
            state: RecorderState::Initial,
            upload: None,
            text: String::new(),
            language: Language::default(),
            status: StatusView::Idle,
            urls: ObjectUrlRegistry::new(),
        };

        controller.view.set_upload_enabled(true);
        controller.view.set_recorder_enabled(true);
        controller.view.set_submit_enabled(true);
        controller
            .view
            .render_recorder(&RecorderView::Initial { notice: None });
        controller.view.render_status(&StatusView::Idle);
        controller
    }

    /// Override the constraints passed to the capture device.
    pub fn with_constraints(mut self, constraints: CaptureConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn phase(&self) -> RecorderPhase {
        self.state.phase()
    }

    pub fn status(&self) -> &StatusView {
        &self.status
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of object URLs currently alive.
    pub fn live_object_urls(&self) -> usize {
        self.urls.live_count()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Elapsed whole seconds of the current recording.
    pub fn elapsed_secs(&self) -> Option<u64> {
        match &self.state {
            RecorderState::Recording(session) => Some(session.elapsed_secs()),
            _ => None,
        }
    }

    /// The recorded clip, if the last capture produced one.
    pub fn recorded_clip(&self) -> Option<&FinishedClip> {
        match &self.state {
            RecorderState::Finished(clip) => clip.as_ref(),
            _ => None,
        }
    }

    /// The payload a submission would use: upload first, then recording.
    pub fn audio_source(&self) -> AudioSource<'_> {
        if let Some(upload) = &self.upload {
            return AudioSource::UploadedFile {
                blob: &upload.blob,
                filename: &upload.filename,
            };
        }

        match self.recorded_clip() {
            Some(clip) => AudioSource::RecordedClip(&clip.blob),
            None => AudioSource::None,
        }
    }

    // ----- recorder transitions -----

    /// Acquire the capture device and begin recording.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        match self.state.phase() {
            RecorderPhase::Initial => {}
            RecorderPhase::Recording => return Ok(()),
            phase @ RecorderPhase::Finished => {
                return Err(ControllerError::InvalidTransition {
                    phase,
                    action: "start recording",
                });
            }
        }

        if self.upload.is_some() {
            return Err(ControllerError::SourceLocked);
        }

        let stream = self.device.acquire(&self.constraints).and_then(|mut stream| {
            match stream.start() {
                Ok(()) => Ok(stream),
                Err(e) => {
                    stream.release();
                    Err(e)
                }
            }
        });

        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("could not start capture: {e}");
                self.view.render_recorder(&RecorderView::Initial {
                    notice: Some(DEVICE_DENIED_NOTICE.to_string()),
                });
                return Err(ControllerError::DeviceAccessDenied(e.to_string()));
            }
        };

        log::info!("recording started");
        self.state = RecorderState::Recording(RecordingSession::new(stream));
        self.view.set_upload_enabled(false);
        self.view.render_recorder(&RecorderView::Recording {
            timer: format_timer(0),
        });
        Ok(())
    }

    /// Advance the recording timer by one second.
    pub fn tick(&mut self) {
        if let RecorderState::Recording(session) = &mut self.state {
            let elapsed = session.tick();
            self.view.render_recorder(&RecorderView::Recording {
                timer: format_timer(elapsed),
            });
        }
    }

    /// Accept a chunk pushed by the capture device.
    pub fn on_data_available(&mut self, chunk: AudioChunk) {
        if let RecorderState::Recording(session) = &mut self.state {
            session.push_chunk(chunk);
        }
    }

    /// Collect chunks the stream has made available since the last poll.
    pub fn poll_capture(&mut self) {
        if let RecorderState::Recording(session) = &mut self.state {
            session.poll();
        }
    }

    /// Stop recording and show the result. A no-op unless recording.
    ///
    /// Returns [`ControllerError::EmptyCapture`] if nothing was captured;
    /// the recorder is then Finished with the terminal empty view.
    pub fn stop(&mut self) -> Result<(), ControllerError> {
        let session = match std::mem::take(&mut self.state) {
            RecorderState::Recording(session) => session,
            other => {
                self.state = other;
                return Ok(());
            }
        };

        let elapsed = session.elapsed_secs();
        let blob = session.finish();
        self.view.set_upload_enabled(true);

        match blob {
            Some(blob) => {
                log::info!("recording stopped after {elapsed}s ({} bytes)", blob.len());
                let playback_url = self.urls.create(&blob);
                self.view.render_recorder(&RecorderView::Finished {
                    playback_url: playback_url.clone(),
                });
                self.state = RecorderState::Finished(Some(FinishedClip { blob, playback_url }));
                Ok(())
            }
            None => {
                log::warn!("recording stopped after {elapsed}s with no audio");
                self.view.render_recorder(&RecorderView::EmptyCapture {
                    message: EMPTY_CAPTURE_MESSAGE.to_string(),
                });
                self.state = RecorderState::Finished(None);
                Err(ControllerError::EmptyCapture)
            }
        }
    }

    /// Return to Initial, discarding any clip and releasing the device.
    pub fn reset(&mut self) {
        match std::mem::take(&mut self.state) {
            RecorderState::Initial => {}
            RecorderState::Recording(mut session) => session.release(),
            RecorderState::Finished(Some(clip)) => {
                self.urls.revoke(&clip.playback_url);
            }
            RecorderState::Finished(None) => {}
        }

        self.view.set_upload_enabled(true);
        self.view
            .render_recorder(&RecorderView::Initial { notice: None });
    }

    /// Save the recorded clip as [`RECORDING_FILE_NAME`] inside `dir`.
    pub fn download(&mut self, dir: &Path) -> Result<PathBuf, ControllerError> {
        let blob = match &self.state {
            RecorderState::Finished(Some(clip)) => clip.blob.clone(),
            _ => return Err(ControllerError::MissingAudio),
        };

        let url = self.urls.create(&blob);
        let path = dir.join(RECORDING_FILE_NAME);
        let written = match self.urls.resolve(&url) {
            Some(blob) => std::fs::write(&path, blob.bytes()),
            None => Ok(()),
        };
        self.urls.revoke(&url);
        written?;

        log::info!("recording saved to {}", path.display());
        Ok(path)
    }

    // ----- upload -----

    /// Use a file as the reference sample. Disables the recorder.
    pub fn attach_upload(&mut self, file: UploadedFile) -> Result<(), ControllerError> {
        if self.state.phase() == RecorderPhase::Recording {
            return Err(ControllerError::SourceLocked);
        }

        log::debug!("attached upload {} ({} bytes)", file.filename, file.blob.len());
        self.upload = Some(file);
        self.view.set_recorder_enabled(false);
        Ok(())
    }

    /// Drop the uploaded file and re-enable the recorder.
    pub fn clear_upload(&mut self) {
        self.upload = None;
        self.view.set_recorder_enabled(true);
    }

    // ----- submission -----

    /// Send the current audio, text and language to the server.
    ///
    /// Validation failures never reach the network. The submit action is
    /// disabled in the view for the duration of the request; the call
    /// blocks and holds `&mut self`, so submissions cannot overlap. On
    /// success returns the URL of the synthesized audio.
    pub fn submit(&mut self) -> Result<String, ControllerError> {
        let audio = self
            .audio_source()
            .blob()
            .map(|blob| (blob.bytes().to_vec(), blob.mime_type().to_string()));
        let Some((audio, mime_type)) = audio else {
            return Err(self.fail(ControllerError::MissingAudio));
        };

        if self.text.trim().is_empty() {
            return Err(self.fail(ControllerError::MissingText));
        }

        let request = CloneRequest::new(audio, self.text.clone())
            .with_mime_type(mime_type)
            .with_language(self.language);

        self.set_status(StatusView::Loading {
            message: LOADING_MESSAGE.to_string(),
        });
        self.view.set_submit_enabled(false);

        let result = self.backend.clone_voice(&request);
        self.view.set_submit_enabled(true);

        match result {
            Ok(response) => {
                log::info!("synthesis ready at {}", response.audio_url);
                self.set_status(StatusView::Success {
                    audio_url: response.audio_url.clone(),
                });
                Ok(response.audio_url)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Download the synthesized audio the last submission produced.
    pub fn fetch_result(&self) -> Result<Vec<u8>, ControllerError> {
        match &self.status {
            StatusView::Success { audio_url } => Ok(self.backend.fetch_audio(audio_url)?),
            _ => Err(ControllerError::MissingAudio),
        }
    }

    fn fail(&mut self, err: ControllerError) -> ControllerError {
        log::warn!("submission failed: {err}");
        self.set_status(StatusView::Error {
            message: err.to_string(),
        });
        err
    }

    fn set_status(&mut self, status: StatusView) {
        self.view.render_status(&status);
        self.status = status;
    }
}
