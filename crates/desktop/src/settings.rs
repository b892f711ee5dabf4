use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use facespot_core::detection::domain::detection::DetectionOptions;
use facespot_core::detection::infrastructure::model_resolver::ModelLocation;
use facespot_core::shared::constants::{DEFAULT_MIN_CONFIDENCE, DEFAULT_MODEL_LOCATION};

/// Read-only configuration; the app never writes this file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory or HTTP(S) base URL the model file is served from.
    pub model_location: String,
    pub min_confidence: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_location: DEFAULT_MODEL_LOCATION.to_string(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Facespot").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring invalid settings in {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn model_location(&self) -> ModelLocation {
        ModelLocation::parse(&self.model_location)
    }

    pub fn detection_options(&self) -> DetectionOptions {
        DetectionOptions::new(self.min_confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load_from(&tmp.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.detection_options().min_confidence(), 0.5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{ "model_location": "https://example.com/models/" }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(
            settings.model_location(),
            ModelLocation::Remote("https://example.com/models".into())
        );
        assert_eq!(settings.min_confidence, DEFAULT_MIN_CONFIDENCE);
    }

    #[test]
    fn test_invalid_json_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_out_of_range_confidence_is_clamped() {
        let settings = Settings {
            min_confidence: 7.0,
            ..Settings::default()
        };
        assert_eq!(settings.detection_options().min_confidence(), 1.0);
    }
}
