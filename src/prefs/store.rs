//! Preference store for local settings.

use std::fmt;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or writing preferences.
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Color theme of the front end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

/// Persisted settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Reads and writes the preferences file.
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    const FILE_NAME: &'static str = "preferences.json";

    /// Create a store in the default directory (`~/.timbre-rs`).
    pub fn new() -> Result<Self, PrefsError> {
        let dir = dirs::home_dir()
            .ok_or(PrefsError::NoHomeDir)?
            .join(".timbre-rs");

        Ok(Self { dir })
    }

    /// Create a store in a custom directory.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the preferences file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(Self::FILE_NAME)
    }

    /// Load preferences, falling back to defaults when none are saved.
    pub fn load(&self) -> Result<Preferences, PrefsError> {
        let path = self.path();

        if !path.exists() {
            return Ok(Preferences::default());
        }

        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Current theme.
    pub fn theme(&self) -> Result<Theme, PrefsError> {
        Ok(self.load()?.theme)
    }

    /// Persist a theme.
    pub fn save_theme(&self, theme: Theme) -> Result<(), PrefsError> {
        std::fs::create_dir_all(&self.dir)?;

        let prefs = Preferences {
            theme,
            updated_at: Some(Utc::now().to_rfc3339()),
        };
        let json = serde_json::to_string_pretty(&prefs)?;
        std::fs::write(self.path(), json)?;

        log::debug!("saved theme {theme} to {}", self.path().display());
        Ok(())
    }

    /// Flip between light and dark and persist the result.
    pub fn toggle_theme(&self) -> Result<Theme, PrefsError> {
        let theme = self.theme()?.toggled();
        self.save_theme(theme)?;
        Ok(theme)
    }
}
