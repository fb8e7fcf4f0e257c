//! Offline speech synthesis through the system engine

use std::time::Duration;

use crate::{Error, Result};

/// Engine default speaking rate in words per minute
const ENGINE_DEFAULT_WPM: f32 = 200.0;

/// Poll interval while waiting for playback to finish
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Synthesizes speech from text and plays it on the default output device
pub struct SpeechSynthesizer {
    engine: tts::Tts,
}

impl SpeechSynthesizer {
    /// Create a new synthesizer with the given speaking rate
    ///
    /// The words-per-minute value is mapped onto the engine's own rate
    /// scale relative to its reported normal rate (the engine default sits
    /// near 200 wpm) and clamped to the supported range.
    ///
    /// # Errors
    ///
    /// Returns error if the system synthesis engine cannot be initialized.
    pub fn new(rate_wpm: u32) -> Result<Self> {
        let mut engine = tts::Tts::default().map_err(|e| Error::Tts(e.to_string()))?;

        let rate = scaled_rate(
            engine.normal_rate(),
            engine.min_rate(),
            engine.max_rate(),
            rate_wpm,
        );
        engine
            .set_rate(rate)
            .map_err(|e| Error::Tts(e.to_string()))?;

        tracing::debug!(rate_wpm, engine_rate = rate, "speech synthesizer initialized");
        Ok(Self { engine })
    }

    /// Speak the text, blocking until playback completes
    ///
    /// Blank-input filtering is the caller's job; this enqueues whatever it
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns error if the engine rejects the utterance or playback state
    /// cannot be queried.
    pub fn speak_blocking(&mut self, text: &str) -> Result<()> {
        self.engine
            .speak(text, false)
            .map_err(|e| Error::Tts(e.to_string()))?;

        // Some backends report is_speaking only after playback has started
        std::thread::sleep(POLL_INTERVAL);
        while self
            .engine
            .is_speaking()
            .map_err(|e| Error::Tts(e.to_string()))?
        {
            std::thread::sleep(POLL_INTERVAL);
        }

        tracing::debug!(chars = text.len(), "utterance complete");
        Ok(())
    }
}

impl crate::menu::Speaker for SpeechSynthesizer {
    fn speak(&mut self, text: &str) -> Result<()> {
        self.speak_blocking(text)
    }
}

/// Map words-per-minute onto an engine rate scale
#[allow(clippy::cast_precision_loss)]
fn scaled_rate(normal: f32, min: f32, max: f32, wpm: u32) -> f32 {
    (normal * wpm as f32 / ENGINE_DEFAULT_WPM).clamp(min, max)
}
