// Settings loading
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PlayerError, Result};

/// Where the lesson documents and audio live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    pub lessons_file: PathBuf,
    pub vocabulary_file: PathBuf,
    pub audio_dir: PathBuf,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            lessons_file: PathBuf::from("content/scripts.json"),
            vocabulary_file: PathBuf::from("content/vocabulary.json"),
            audio_dir: PathBuf::from("assets/audio"),
        }
    }
}

/// Playback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub default_rate: f64,
    pub skip_seconds: f64,
    pub rate_options: Vec<f64>, // Offered by the speed selector
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            default_rate: 1.0,
            skip_seconds: 5.0,
            rate_options: vec![0.5, 0.75, 1.0, 1.25, 1.5],
        }
    }
}

/// Text-to-speech settings for flashcards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub language: String, // BCP 47 tag, e.g. "en-GB"
    pub voice_hint: Option<String>,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: "en-GB".to_string(),
            voice_hint: None,
            rate: 0.9, // A little slower helps learners
            pitch: 1.0,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub version: i32, // Settings schema version
    pub content: ContentSettings,
    pub playback: PlaybackSettings,
    pub speech: SpeechSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: 1,
            content: ContentSettings::default(),
            playback: PlaybackSettings::default(),
            speech: SpeechSettings::default(),
        }
    }
}

impl AppSettings {
    /// Get the settings file path
    pub fn get_settings_path(app_dir: &Path) -> PathBuf {
        app_dir.join("settings.json")
    }

    /// Load settings from file, or return defaults if file doesn't exist.
    /// Content paths are resolved against `app_dir`.
    pub fn load(app_dir: &Path) -> Result<Self> {
        let path = Self::get_settings_path(app_dir);

        let settings = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| PlayerError::Settings(format!("failed to read {:?}: {}", path, e)))?;
            let settings: AppSettings = serde_json::from_str(&content)
                .map_err(|e| PlayerError::Settings(format!("failed to parse {:?}: {}", path, e)))?;
            log::info!("[Settings] Loaded settings from {:?}", path);
            settings
        } else {
            log::info!("[Settings] No settings file found, using defaults");
            Self::default()
        };

        Ok(settings.validated()?.resolve(app_dir))
    }

    /// Make relative content paths absolute under `base`
    pub fn resolve(mut self, base: &Path) -> Self {
        let join = |p: &PathBuf| if p.is_absolute() { p.clone() } else { base.join(p) };
        self.content.lessons_file = join(&self.content.lessons_file);
        self.content.vocabulary_file = join(&self.content.vocabulary_file);
        self.content.audio_dir = join(&self.content.audio_dir);
        self
    }

    fn validated(self) -> Result<Self> {
        let playback = &self.playback;
        if !(playback.default_rate.is_finite() && playback.default_rate > 0.0) {
            return Err(PlayerError::Settings(format!(
                "default_rate must be positive, got {}",
                playback.default_rate
            )));
        }
        if !(playback.skip_seconds.is_finite() && playback.skip_seconds > 0.0) {
            return Err(PlayerError::Settings(format!(
                "skip_seconds must be positive, got {}",
                playback.skip_seconds
            )));
        }
        if let Some(bad) = playback.rate_options.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
            return Err(PlayerError::Settings(format!("invalid rate option {}", bad)));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load(dir.path()).unwrap();
        assert_eq!(settings.playback.skip_seconds, 5.0);
        assert_eq!(settings.speech.language, "en-GB");
        assert_eq!(
            settings.content.lessons_file,
            dir.path().join("content/scripts.json")
        );
        assert_eq!(settings.content.audio_dir, dir.path().join("assets/audio"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            AppSettings::get_settings_path(dir.path()),
            r#"{ "playback": { "skip_seconds": 10 }, "speech": { "voice_hint": "Sonia" } }"#,
        )
        .unwrap();

        let settings = AppSettings::load(dir.path()).unwrap();
        assert_eq!(settings.playback.skip_seconds, 10.0);
        assert_eq!(settings.playback.default_rate, 1.0);
        assert_eq!(settings.speech.voice_hint.as_deref(), Some("Sonia"));
        assert_eq!(settings.speech.language, "en-GB");
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let mut settings = AppSettings::default();
        let abs = std::env::temp_dir().join("lessons.json");
        settings.content.lessons_file = abs.clone();
        let resolved = settings.resolve(Path::new("/srv/app"));
        assert_eq!(resolved.content.lessons_file, abs);
        assert_eq!(
            resolved.content.vocabulary_file,
            Path::new("/srv/app").join("content/vocabulary.json")
        );
    }

    #[test]
    fn test_rejects_non_positive_rate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            AppSettings::get_settings_path(dir.path()),
            r#"{ "playback": { "default_rate": 0 } }"#,
        )
        .unwrap();
        assert!(matches!(
            AppSettings::load(dir.path()),
            Err(PlayerError::Settings(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(AppSettings::get_settings_path(dir.path()), "{ not json").unwrap();
        assert!(AppSettings::load(dir.path()).is_err());
    }
}
