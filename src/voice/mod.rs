//! Voice processing module
//!
//! Handles audio capture, local `whisper.cpp` recognition, offline synthesis,
//! and the record→transcribe lifecycle used by the menu dispatcher.

mod capture;
mod dictation;
mod stt;
mod tts;

pub use capture::{record_to_file, write_recording, AudioCapture, SAMPLE_RATE};
pub use dictation::VoiceDictation;
pub use stt::{ModelTier, Transcriber};
pub use tts::SpeechSynthesizer;
