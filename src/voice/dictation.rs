//! Record-then-transcribe lifecycle

use std::io::Write;

use crate::config::RecordSettings;
use crate::menu::Dictation;
use crate::voice::{record_to_file, Transcriber};
use crate::Result;

/// One-utterance dictation pipeline: capture, persist, transcribe, clean up
///
/// Owns the transient recording for its full lifetime. The temp WAV is
/// deleted after a successful transcription and retained on failure so the
/// audio is available for diagnosis.
pub struct VoiceDictation {
    record: RecordSettings,
    transcriber: Transcriber,
}

impl VoiceDictation {
    /// Create a dictation pipeline over the given capture settings
    #[must_use]
    pub const fn new(record: RecordSettings, transcriber: Transcriber) -> Self {
        Self {
            record,
            transcriber,
        }
    }
}

impl Dictation for VoiceDictation {
    fn listen(&mut self, output: &mut dyn Write) -> Result<String> {
        writeln!(output, "Recording... Speak now!")?;
        output.flush()?;
        let path = record_to_file(
            self.record.duration_secs,
            self.record.sample_rate,
            self.record.channels,
        )?;

        writeln!(output, "Transcribing...")?;
        output.flush()?;
        match self.transcriber.transcribe(&path) {
            Ok(text) => {
                if let Err(e) = std::fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove recording");
                }
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "transcription failed, recording retained");
                Err(e)
            }
        }
    }
}
