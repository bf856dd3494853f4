//! Recording/upload controller.
//!
//! This module owns the recorder state machine (initial, recording,
//! finished), the choice between an uploaded file and a recorded clip,
//! and the single submission to the cloning backend. Rendering goes
//! through the [`View`] trait so the controller can run without a real
//! front end.

mod controller;
mod state;

pub use controller::{AudioSource, CloneController, ControllerError};
pub use state::{
    DEVICE_DENIED_NOTICE, EMPTY_CAPTURE_MESSAGE, FinishedClip, LOADING_MESSAGE,
    RECORDING_FILE_NAME, RecorderPhase, RecorderState, RecorderView, RecordingSession, StatusView,
    format_timer,
};

/// Front end the controller renders into.
pub trait View {
    /// Replace the contents of the recorder area.
    fn render_recorder(&mut self, view: &RecorderView);

    /// Replace the contents of the status area.
    fn render_status(&mut self, status: &StatusView);

    /// Enable or disable the file upload control.
    fn set_upload_enabled(&mut self, enabled: bool);

    /// Enable or disable the recorder area.
    fn set_recorder_enabled(&mut self, enabled: bool);

    /// Enable or disable the submit action.
    fn set_submit_enabled(&mut self, enabled: bool);
}
