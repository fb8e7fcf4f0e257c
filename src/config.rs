//! Configuration management for parlo

use std::path::PathBuf;

use serde::Deserialize;

use crate::Result;

/// Default recording duration in seconds
pub const DEFAULT_DURATION_SECS: u32 = 5;

/// Default speaking rate in words per minute (engine default is near 200)
pub const DEFAULT_RATE_WPM: u32 = 180;

/// Parlo configuration
///
/// Loaded from `config.toml` under the platform config directory when
/// present; every field has a default reproducing the fixed values of the
/// original program. CLI flags override individual fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Recording configuration
    pub record: RecordSettings,

    /// Speech-to-text configuration
    pub stt: SttSettings,

    /// Text-to-speech configuration
    pub tts: TtsSettings,
}

/// Recording configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    /// Capture duration in seconds
    pub duration_secs: u32,

    /// Capture sample rate in Hz (16 kHz is what whisper expects)
    pub sample_rate: u32,

    /// Channel count (mono)
    pub channels: u16,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            sample_rate: crate::voice::SAMPLE_RATE,
            channels: 1,
        }
    }
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SttSettings {
    /// Forced transcription language (ISO 639-1); never auto-detected
    pub language: String,

    /// Directory holding an already downloaded ggml model; when unset the
    /// model is fetched into the platform cache directory on first use
    pub model_dir: Option<PathBuf>,
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            model_dir: None,
        }
    }
}

/// Text-to-speech configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TtsSettings {
    /// Speaking rate in words per minute
    pub rate_wpm: u32,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            rate_wpm: DEFAULT_RATE_WPM,
        }
    }
}

impl Settings {
    /// Load settings from the platform config file, falling back to defaults
    ///
    /// A missing config file is not an error; a malformed one is.
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let Some(path) = config_file_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let settings: Self = toml::from_str(&contents)?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(settings)
    }

    /// Validate the capture parameters
    ///
    /// Every parameter must be positive, and the sample rate must match
    /// what the recognition model consumes; accepting another rate here
    /// would record successfully and then fail on every transcription.
    ///
    /// # Errors
    ///
    /// Returns error if duration or channel count is zero, or the sample
    /// rate differs from the recognition input rate.
    pub fn validate(&self) -> Result<()> {
        if self.record.duration_secs == 0 {
            return Err(crate::Error::Config(
                "recording duration must be positive".to_string(),
            ));
        }
        if self.record.sample_rate != crate::voice::SAMPLE_RATE {
            return Err(crate::Error::Config(format!(
                "sample rate must be {} (recognition input rate), got {}",
                crate::voice::SAMPLE_RATE,
                self.record.sample_rate
            )));
        }
        if self.record.channels == 0 {
            return Err(crate::Error::Config(
                "channel count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Path of the user config file, if a home directory can be resolved
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "omni", "parlo")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Platform cache directory for downloaded models
#[must_use]
pub fn model_cache_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "omni", "parlo")
        .map(|dirs| dirs.cache_dir().join("models"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_values() {
        let settings = Settings::default();
        assert_eq!(settings.record.duration_secs, 5);
        assert_eq!(settings.record.sample_rate, 16000);
        assert_eq!(settings.record.channels, 1);
        assert_eq!(settings.stt.language, "en");
        assert_eq!(settings.tts.rate_wpm, 180);
        assert!(settings.stt.model_dir.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [record]
            duration_secs = 3

            [tts]
            rate_wpm = 150
            "#,
        )
        .unwrap();

        assert_eq!(settings.record.duration_secs, 3);
        assert_eq!(settings.record.sample_rate, 16000);
        assert_eq!(settings.tts.rate_wpm, 150);
        assert_eq!(settings.stt.language, "en");
    }

    #[test]
    fn zero_duration_rejected() {
        let mut settings = Settings::default();
        settings.record.duration_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn non_recognition_sample_rate_rejected() {
        let mut settings = Settings::default();
        settings.record.sample_rate = 44100;
        assert!(settings.validate().is_err());

        settings.record.sample_rate = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_channels_rejected() {
        let mut settings = Settings::default();
        settings.record.channels = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn default_settings_validate() {
        assert!(Settings::default().validate().is_ok());
    }
}
