//! Interactive menu dispatcher
//!
//! A two-state loop (`Idle`, `Exit`) over a closed input alphabet. The
//! speech backends sit behind the [`Speaker`] and [`Dictation`] seams and
//! the console behind generic reader/writer, so the dispatcher is testable
//! without audio hardware.

use std::io::{BufRead, Write};

use crate::{Error, Result};

/// Synthesizes and plays a piece of text, blocking until playback completes
pub trait Speaker {
    /// Speak the given text aloud
    ///
    /// # Errors
    ///
    /// Returns error if the synthesis engine or output device fails.
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Records from the microphone and returns the transcription
pub trait Dictation {
    /// Record one utterance and transcribe it
    ///
    /// Progress notices ("Recording...", "Transcribing...") go through
    /// `output` so the dialogue stays on the dispatcher's console.
    ///
    /// # Errors
    ///
    /// Returns error if capture or recognition fails.
    fn listen(&mut self, output: &mut dyn Write) -> Result<String>;
}

/// Speaker that defers engine construction to the first utterance
///
/// An engine-init failure (no output device, no system speech backend)
/// surfaces as a per-iteration `Error::Tts` instead of aborting startup,
/// and construction is retried on the next utterance. A successfully
/// built engine is reused across calls.
pub struct LazySpeaker<S, F>
where
    S: Speaker,
    F: FnMut() -> Result<S>,
{
    init: F,
    engine: Option<S>,
}

impl<S, F> LazySpeaker<S, F>
where
    S: Speaker,
    F: FnMut() -> Result<S>,
{
    /// Create a lazy speaker from an engine constructor
    #[must_use]
    pub fn new(init: F) -> Self {
        Self { init, engine: None }
    }
}

impl<S, F> Speaker for LazySpeaker<S, F>
where
    S: Speaker,
    F: FnMut() -> Result<S>,
{
    fn speak(&mut self, text: &str) -> Result<()> {
        if self.engine.is_none() {
            self.engine = Some((self.init)()?);
        }
        self.engine
            .as_mut()
            .ok_or_else(|| Error::Tts("synthesis engine unavailable".to_string()))?
            .speak(text)
    }
}

/// A recognized menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Speak typed text aloud
    Speak,
    /// Record and transcribe speech
    Transcribe,
    /// Leave the loop
    Exit,
}

impl Choice {
    /// Parse a raw console line into a menu choice
    ///
    /// The alphabet is exactly `"1"`, `"2"`, `"3"` after trimming; anything
    /// else is unrecognized.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Speak),
            "2" => Some(Self::Transcribe),
            "3" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Run the interactive menu loop until the user exits
///
/// Errors from a branch are reported to `output` and abort only that
/// iteration; the loop re-prompts. End of input terminates the loop the
/// same way as choice `"3"` so piped stdin cannot spin.
///
/// # Errors
///
/// Returns error only if the console itself fails (read or write).
pub fn run<R, W>(
    input: &mut R,
    output: &mut W,
    speaker: &mut dyn Speaker,
    dictation: &mut dyn Dictation,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(output, "\n1) Text to Speech")?;
        writeln!(output, "2) Speech to Text")?;
        writeln!(output, "3) Exit")?;
        write!(output, "Choose option: ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            tracing::debug!("end of input, leaving menu");
            writeln!(output, "Exiting...")?;
            return Ok(());
        };

        match Choice::parse(&line) {
            Some(Choice::Speak) => {
                write!(output, "Enter text: ")?;
                output.flush()?;

                let text = read_line(input)?.unwrap_or_default();
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }

                if let Err(e) = speaker.speak(text) {
                    report(output, &e)?;
                }
            }
            Some(Choice::Transcribe) => match dictation.listen(output) {
                Ok(text) => writeln!(output, "You said: {text}")?,
                Err(e) => report(output, &e)?,
            },
            Some(Choice::Exit) => {
                writeln!(output, "Exiting...")?;
                return Ok(());
            }
            None => {
                writeln!(output, "Invalid choice, try again.")?;
            }
        }
    }
}

/// Read one line, distinguishing end of input from an empty line
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let n = input.read_line(&mut line)?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Report a branch error without breaking the loop
fn report<W: Write>(output: &mut W, e: &Error) -> Result<()> {
    tracing::error!(error = %e, "menu operation failed");
    writeln!(output, "Error: {e}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognizes_the_three_tokens() {
        assert_eq!(Choice::parse("1"), Some(Choice::Speak));
        assert_eq!(Choice::parse("2"), Some(Choice::Transcribe));
        assert_eq!(Choice::parse("3"), Some(Choice::Exit));
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(Choice::parse(" 1 \n"), Some(Choice::Speak));
        assert_eq!(Choice::parse("\t3\n"), Some(Choice::Exit));
    }

    #[test]
    fn parse_rejects_everything_else() {
        assert_eq!(Choice::parse(""), None);
        assert_eq!(Choice::parse("9"), None);
        assert_eq!(Choice::parse("exit"), None);
        assert_eq!(Choice::parse("12"), None);
    }
}
