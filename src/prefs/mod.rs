//! Local preference persistence.
//!
//! A single setting survives between runs: the color theme.

mod store;

pub use store::{PreferenceStore, Preferences, PrefsError, Theme};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_custom_directory() {
        let store = PreferenceStore::with_dir(PathBuf::from("/tmp/timbre-prefs"));
        assert_eq!(
            store.path(),
            PathBuf::from("/tmp/timbre-prefs/preferences.json")
        );
    }

    #[test]
    fn test_default_theme_is_light() {
        let temp_dir = TempDir::new().unwrap();
        let store = PreferenceStore::with_dir(temp_dir.path().to_path_buf());

        assert_eq!(store.theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_save_and_load_theme() {
        let temp_dir = TempDir::new().unwrap();
        let store = PreferenceStore::with_dir(temp_dir.path().join("nested"));

        store.save_theme(Theme::Dark).unwrap();

        let prefs = store.load().unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.updated_at.is_some());
    }

    #[test]
    fn test_toggle_theme() {
        let temp_dir = TempDir::new().unwrap();
        let store = PreferenceStore::with_dir(temp_dir.path().to_path_buf());

        assert_eq!(store.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(store.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(store.theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_theme_serializes_lowercase() {
        let temp_dir = TempDir::new().unwrap();
        let store = PreferenceStore::with_dir(temp_dir.path().to_path_buf());

        store.save_theme(Theme::Dark).unwrap();

        let json = std::fs::read_to_string(store.path()).unwrap();
        assert!(json.contains("\"theme\": \"dark\""));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = PreferenceStore::with_dir(temp_dir.path().to_path_buf());
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(
            store.load(),
            Err(PrefsError::SerializationError(_))
        ));
    }
}
