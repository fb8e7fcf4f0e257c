use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use parlo::voice::{AudioCapture, ModelTier, SpeechSynthesizer, Transcriber, VoiceDictation};
use parlo::{LazySpeaker, Settings};

/// Parlo - offline speech console: type to speak, speak to transcribe
#[derive(Parser)]
#[command(name = "parlo", version, about)]
struct Cli {
    /// Recording duration in seconds
    #[arg(short, long, env = "PARLO_DURATION")]
    duration: Option<u32>,

    /// Capture sample rate in Hz (the recognition model expects 16000)
    #[arg(long, env = "PARLO_SAMPLE_RATE")]
    sample_rate: Option<u32>,

    /// Directory with an already downloaded ggml whisper model
    #[arg(long, env = "PARLO_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u32,
    },
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,parlo=info",
        1 => "info,parlo=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load()?;
    if let Some(duration) = cli.duration {
        settings.record.duration_secs = duration;
    }
    if let Some(sample_rate) = cli.sample_rate {
        settings.record.sample_rate = sample_rate;
    }
    if let Some(model_dir) = cli.model_dir {
        settings.stt.model_dir = Some(model_dir);
    }
    settings.validate()?;

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(&settings, duration),
            Command::TestTts { text } => test_tts(&settings, &text),
        };
    }

    tracing::debug!(?settings, "starting menu loop");

    // Lazily-initialized singletons: the synthesis engine builds on the
    // first "1" selection, the recognition model loads on the first "2";
    // either failing costs one menu iteration, not the process
    let rate_wpm = settings.tts.rate_wpm;
    let mut speaker = LazySpeaker::new(move || SpeechSynthesizer::new(rate_wpm));
    let transcriber = Transcriber::new(
        ModelTier::Tiny,
        &settings.stt.language,
        settings.stt.model_dir.clone(),
    );
    let mut dictation = VoiceDictation::new(settings.record.clone(), transcriber);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    parlo::menu::run(
        &mut stdin.lock(),
        &mut stdout.lock(),
        &mut speaker,
        &mut dictation,
    )?;

    Ok(())
}

/// Record a short clip and report what was captured
fn test_mic(settings: &Settings, duration: u32) -> anyhow::Result<()> {
    println!("Recording {duration}s from the default input device...");

    let capture = AudioCapture::new(settings.record.sample_rate, settings.record.channels)?;
    let samples = capture.record(duration)?;

    let peak = samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
    println!(
        "Captured {} samples at {}Hz (peak level {peak:.3})",
        samples.len(),
        capture.sample_rate()
    );

    if peak < 0.01 {
        println!("Warning: near-silent capture; check the microphone.");
    }

    std::io::stdout().flush()?;
    Ok(())
}

/// Speak a literal string through the synthesis engine
fn test_tts(settings: &Settings, text: &str) -> anyhow::Result<()> {
    println!("Speaking: {text}");
    let mut speaker = SpeechSynthesizer::new(settings.tts.rate_wpm)?;
    speaker.speak_blocking(text)?;
    Ok(())
}
