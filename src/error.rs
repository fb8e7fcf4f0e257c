//! Error types for parlo

use thiserror::Error;

/// Result type alias for parlo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in parlo
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device error (capture or playback device missing/busy)
    #[error("audio error: {0}")]
    Audio(String),

    /// Recognition model download or load error
    #[error("model error: {0}")]
    ModelLoad(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
