//! Speech-to-text via local `whisper.cpp` inference

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Base URL for ggml model downloads
const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Pretrained model size/accuracy tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModelTier {
    /// Smallest and fastest, least accurate; the tier this program uses
    #[default]
    Tiny,
    /// Larger than tiny, better accuracy
    Base,
    /// Noticeably slower, noticeably better
    Small,
}

impl ModelTier {
    /// ggml file name on `HuggingFace`
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Tiny => "ggml-tiny.bin",
            Self::Base => "ggml-base.bin",
            Self::Small => "ggml-small.bin",
        }
    }

    /// Download URL for this tier
    #[must_use]
    pub fn url(self) -> String {
        format!("{MODEL_BASE_URL}/{}", self.file_name())
    }

    /// Expected SHA-256 of the ggml file (from the `HuggingFace` LFS metadata)
    #[must_use]
    pub const fn checksum(self) -> &'static str {
        match self {
            Self::Tiny => "be07e048e1e599ad46341c8d2a135645097a538221678b7acdd1b1919c6e1b21",
            Self::Base => "60ed5bc3dd14eea856493d334349b405782ddcaf0028d4b5df4088345fba2efe",
            Self::Small => "1be3a9b2063867b937e64e2ec7483364a79917e157fa98c5d94b5c1fffea987b",
        }
    }
}

/// Transcribes recorded audio with a lazily-loaded `whisper.cpp` model
///
/// The context is created on first use and reused across calls; reloading
/// per call would not change observable behavior, only cost.
pub struct Transcriber {
    tier: ModelTier,
    language: String,
    model_dir: Option<PathBuf>,
    context: Mutex<Option<whisper_rs::WhisperContext>>,
}

impl Transcriber {
    /// Create a new transcriber; no IO happens until the first call
    #[must_use]
    pub fn new(tier: ModelTier, language: &str, model_dir: Option<PathBuf>) -> Self {
        Self {
            tier,
            language: language.to_string(),
            model_dir,
            context: Mutex::new(None),
        }
    }

    /// Transcribe a recorded WAV file to text
    ///
    /// Runs CPU inference with the configured language forced (never
    /// auto-detected) and greedy sampling, then concatenates the segment
    /// texts. Zero segments yields an empty string, not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the file is unreadable or corrupt, or the model
    /// cannot be acquired or loaded.
    pub fn transcribe(&self, path: &Path) -> Result<String> {
        let samples = read_wav_mono(path)?;
        self.ensure_loaded()?;

        let guard = self
            .context
            .lock()
            .map_err(|_| Error::Stt("model context lock poisoned".to_string()))?;
        let ctx = guard
            .as_ref()
            .ok_or_else(|| Error::Stt("model not loaded".to_string()))?;

        let mut state = ctx
            .create_state()
            .map_err(|e| Error::Stt(e.to_string()))?;

        let mut params =
            whisper_rs::FullParams::new(whisper_rs::SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.language));
        params.set_translate(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &samples)
            .map_err(|e| Error::Stt(e.to_string()))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| Error::Stt(e.to_string()))?;

        let mut text = String::new();
        for i in 0..num_segments {
            if let Ok(segment) = state.full_get_segment_text(i) {
                text.push_str(&segment);
            }
        }

        let text = text.trim().to_string();
        tracing::info!(transcript = %text, "transcription complete");
        Ok(text)
    }

    /// Load the model into memory if it is not loaded yet
    ///
    /// # Errors
    ///
    /// Returns error if the model file cannot be acquired or parsed.
    pub fn ensure_loaded(&self) -> Result<()> {
        let mut guard = self
            .context
            .lock()
            .map_err(|_| Error::ModelLoad("model context lock poisoned".to_string()))?;
        if guard.is_some() {
            return Ok(());
        }

        let model_path = self.model_path()?;
        let path_str = model_path
            .to_str()
            .ok_or_else(|| Error::ModelLoad("model path is not valid UTF-8".to_string()))?;

        let ctx = whisper_rs::WhisperContext::new_with_params(
            path_str,
            whisper_rs::WhisperContextParameters::default(),
        )
        .map_err(|e| Error::ModelLoad(e.to_string()))?;

        tracing::info!(path = %model_path.display(), "whisper model loaded");
        *guard = Some(ctx);
        Ok(())
    }

    /// Resolve the model file, downloading it into the cache if needed
    fn model_path(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.model_dir {
            let path = dir.join(self.tier.file_name());
            if !path.exists() {
                return Err(Error::ModelLoad(format!(
                    "model not found: {}",
                    path.display()
                )));
            }
            return Ok(path);
        }

        let cache_dir = crate::config::model_cache_dir()
            .ok_or_else(|| Error::ModelLoad("cannot resolve cache directory".to_string()))?;
        let path = cache_dir.join(self.tier.file_name());

        if path.exists() {
            if file_sha256(&path)? == self.tier.checksum() {
                return Ok(path);
            }
            tracing::warn!(path = %path.display(), "cached model failed checksum, re-downloading");
            std::fs::remove_file(&path)?;
        }

        download_model(self.tier, &path)?;
        Ok(path)
    }
}

/// Download a ggml model with SHA-256 verification
///
/// The file is written next to its final path and only renamed into place
/// after the checksum matches.
fn download_model(tier: ModelTier, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let url = tier.url();
    tracing::info!(%url, "downloading whisper model (first run only)");

    let mut response = reqwest::blocking::get(&url)?.error_for_status()?;

    let part = dest.with_extension("part");
    let mut file = std::fs::File::create(&part)?;
    response.copy_to(&mut file)?;
    drop(file);

    let actual = file_sha256(&part)?;
    if actual != tier.checksum() {
        std::fs::remove_file(&part)?;
        return Err(Error::ModelLoad(format!(
            "model checksum mismatch: expected {}, got {actual}",
            tier.checksum()
        )));
    }

    std::fs::rename(&part, dest)?;
    tracing::info!(path = %dest.display(), "model downloaded and verified");
    Ok(())
}

/// SHA-256 of a file, streamed in chunks
fn file_sha256(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0_u8; 1 << 20];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Read a WAV file into mono f32 samples at the capture rate
///
/// Accepts the 32-bit float format the recorder writes, plus 16-bit int for
/// externally produced files. Multi-channel audio is averaged per frame.
fn read_wav_mono(path: &Path) -> Result<Vec<f32>> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| Error::Stt(format!("cannot read {}: {e}", path.display())))?;
    let spec = reader.spec();

    if spec.sample_rate != super::SAMPLE_RATE {
        return Err(Error::Stt(format!(
            "unsupported sample rate {} (expected {})",
            spec.sample_rate,
            super::SAMPLE_RATE
        )));
    }

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Stt(e.to_string()))?,
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| f32::from(v) / 32768.0))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Stt(e.to_string()))?,
        (format, bits) => {
            return Err(Error::Stt(format!(
                "unsupported sample format: {bits}-bit {format:?}"
            )));
        }
    };

    if spec.channels <= 1 {
        return Ok(samples);
    }

    let channels = usize::from(spec.channels);
    #[allow(clippy::cast_precision_loss)]
    let mono = samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();
    Ok(mono)
}
