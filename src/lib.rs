//! Parlo - offline speech console
//!
//! This library provides the pieces behind the `parlo` binary:
//! - Audio capture from the default microphone (cpal)
//! - Local speech recognition via `whisper.cpp` (tiny tier, CPU)
//! - Offline speech synthesis through the system engine
//! - The interactive menu dispatcher tying them together
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │              Menu dispatcher               │
//! │   "1" speak  │  "2" transcribe  │  "3"    │
//! └───────┬──────────────┬────────────────────┘
//!         │              │
//! ┌───────▼─────┐  ┌─────▼──────────────────┐
//! │  Synthesis  │  │  Capture → Recognition  │
//! │  (system)   │  │  (cpal → whisper.cpp)   │
//! └─────────────┘  └────────────────────────┘
//! ```
//!
//! Everything is single-threaded and blocking: one recording, one inference,
//! one utterance per menu selection.

pub mod config;
pub mod error;
pub mod menu;
pub mod voice;

pub use config::Settings;
pub use error::{Error, Result};
pub use menu::{Choice, Dictation, LazySpeaker, Speaker};
pub use voice::{AudioCapture, SpeechSynthesizer, Transcriber, SAMPLE_RATE};
