//! Terminal front end for the clone controller.

use std::io::Write;

use console::{Color, Style};

use crate::prefs::Theme;
use crate::recorder::{RecorderView, StatusView, View};

/// Renders controller views as lines on stdout/stderr.
///
/// Colors follow the saved theme and are only emitted when the target
/// stream is a terminal.
pub struct TerminalView {
    theme: Theme,
    color: bool,
}

impl TerminalView {
    pub fn new(theme: Theme) -> Self {
        Self { theme, color: true }
    }

    /// Never emit colors, even on a terminal.
    pub fn plain(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    fn style(&self, color: Color, stderr: bool) -> Style {
        let mut style = Style::new().fg(color);
        if self.theme == Theme::Dark {
            style = style.bright();
        }
        if stderr {
            style = style.for_stderr();
        }
        if !self.color {
            style = style.force_styling(false);
        }
        style
    }

    fn accent(&self, text: &str) -> String {
        self.style(Color::Blue, false).apply_to(text).to_string()
    }

    fn success(&self, text: &str) -> String {
        self.style(Color::Green, false).apply_to(text).to_string()
    }

    /// Error text; `stderr` picks which stream's terminal check applies.
    fn danger(&self, text: &str, stderr: bool) -> String {
        self.style(Color::Red, stderr).apply_to(text).to_string()
    }
}

impl View for TerminalView {
    fn render_recorder(&mut self, view: &RecorderView) {
        match view {
            RecorderView::Initial { notice: Some(notice) } => eprintln!("{}", self.danger(notice, true)),
            RecorderView::Initial { notice: None } => {}
            RecorderView::Recording { timer } => {
                print!("\r{} {timer}", self.danger("● Recording", false));
                let _ = std::io::stdout().flush();
            }
            RecorderView::Finished { playback_url } => {
                println!("\nYour recording: {}", self.accent(playback_url.as_str()));
            }
            RecorderView::EmptyCapture { message } => eprintln!("\n{}", self.danger(message, true)),
        }
    }

    fn render_status(&mut self, status: &StatusView) {
        match status {
            StatusView::Idle => {}
            StatusView::Loading { message } => println!("{}", self.accent(message)),
            StatusView::Success { audio_url } => {
                println!("{}", self.success("Success! Your cloned voice is ready."));
                println!("  {audio_url}");
            }
            StatusView::Error { message } => {
                eprintln!("{} {message}", self.danger("Error:", true));
            }
        }
    }

    fn set_upload_enabled(&mut self, enabled: bool) {
        log::trace!("upload control enabled: {enabled}");
    }

    fn set_recorder_enabled(&mut self, enabled: bool) {
        log::trace!("recorder enabled: {enabled}");
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        log::trace!("submit enabled: {enabled}");
    }
}
