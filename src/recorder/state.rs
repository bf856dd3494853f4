//! Recorder states and the views rendered for them.

use std::fmt;

use crate::blob::{AudioBlob, ObjectUrl};
use crate::capture::{AudioChunk, CaptureStream};

/// Fixed name used when exporting a recorded clip.
pub const RECORDING_FILE_NAME: &str = "timbre_recording.wav";

pub const DEVICE_DENIED_NOTICE: &str = "Microphone access denied.";
pub const EMPTY_CAPTURE_MESSAGE: &str = "Recording failed. No audio captured.";
pub const LOADING_MESSAGE: &str = "Generating voice... This may take a moment.";

/// Format whole seconds as `MM:SS`. Minutes are not capped.
pub fn format_timer(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Which of the three recorder states is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderPhase {
    Initial,
    Recording,
    Finished,
}

impl fmt::Display for RecorderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecorderPhase::Initial => "initial",
            RecorderPhase::Recording => "recording",
            RecorderPhase::Finished => "finished",
        })
    }
}

/// A live capture: owns the stream, the elapsed time and the chunks so far.
pub struct RecordingSession {
    stream: Box<dyn CaptureStream>,
    elapsed_secs: u64,
    chunks: Vec<AudioChunk>,
    released: bool,
}

impl RecordingSession {
    pub(crate) fn new(stream: Box<dyn CaptureStream>) -> Self {
        Self {
            stream,
            elapsed_secs: 0,
            chunks: Vec::new(),
            released: false,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub(crate) fn tick(&mut self) -> u64 {
        self.elapsed_secs += 1;
        self.elapsed_secs
    }

    pub(crate) fn push_chunk(&mut self, chunk: AudioChunk) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    pub(crate) fn poll(&mut self) {
        for chunk in self.stream.poll_chunks() {
            self.push_chunk(chunk);
        }
    }

    /// Halt the stream, release the device and assemble the clip.
    ///
    /// A stream that fails to flush still gets released; whatever was
    /// collected before the failure is kept.
    pub(crate) fn finish(mut self) -> Option<AudioBlob> {
        match self.stream.stop() {
            Ok(flushed) => {
                for chunk in flushed {
                    self.push_chunk(chunk);
                }
            }
            Err(e) => log::warn!("capture stream failed to stop cleanly: {e}"),
        }
        self.release();

        let mime_type = self.stream.mime_type().to_string();
        AudioBlob::from_chunks(&self.chunks, &mime_type)
    }

    pub(crate) fn release(&mut self) {
        if !self.released {
            self.stream.release();
            self.released = true;
        }
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for RecordingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSession")
            .field("elapsed_secs", &self.elapsed_secs)
            .field("chunks", &self.chunks.len())
            .field("released", &self.released)
            .finish()
    }
}

/// A captured clip and the URL its player points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedClip {
    pub blob: AudioBlob,
    pub playback_url: ObjectUrl,
}

/// The recorder state machine.
#[derive(Debug, Default)]
pub enum RecorderState {
    #[default]
    Initial,
    Recording(RecordingSession),
    /// `None` when the device produced no audio.
    Finished(Option<FinishedClip>),
}

impl RecorderState {
    pub fn phase(&self) -> RecorderPhase {
        match self {
            RecorderState::Initial => RecorderPhase::Initial,
            RecorderState::Recording(_) => RecorderPhase::Recording,
            RecorderState::Finished(_) => RecorderPhase::Finished,
        }
    }
}

/// What the recorder area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderView {
    /// Record button, plus a notice if the last start attempt failed.
    Initial { notice: Option<String> },
    Recording { timer: String },
    /// Player with "record again" and "download" actions.
    Finished { playback_url: ObjectUrl },
    /// Terminal view for a capture that produced nothing.
    EmptyCapture { message: String },
}

/// What the status area shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusView {
    #[default]
    Idle,
    Loading { message: String },
    Success { audio_url: String },
    Error { message: String },
}
