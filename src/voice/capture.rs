//! Audio capture from microphone

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Prefix for recording filenames in the temp directory
const RECORDING_PREFIX: &str = "record_";

/// Captures audio from the default input device
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    /// Channel count the caller asked for; device config may differ
    channels: u16,
}

impl AudioCapture {
    /// Create a new audio capture instance
    ///
    /// Prefers a device config that matches the requested channel count at
    /// the requested rate. For mono requests, a multi-channel device config
    /// is accepted and downmixed during capture.
    ///
    /// # Errors
    ///
    /// Returns error if no input device is available or no config supports
    /// the requested rate.
    pub fn new(sample_rate: u32, channels: u16) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supports_rate = |c: &cpal::SupportedStreamConfigRange| {
            c.min_sample_rate() <= SampleRate(sample_rate)
                && c.max_sample_rate() >= SampleRate(sample_rate)
        };

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| c.channels() == channels && supports_rate(c))
            .or_else(|| {
                // Mono requests fall back to any channel layout; frames are
                // downmixed in the capture callback
                if channels == 1 {
                    device
                        .supported_input_configs()
                        .ok()?
                        .find(supports_rate)
                } else {
                    None
                }
            })
            .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(sample_rate))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate,
            device_channels = config.channels,
            channels,
            "audio capture initialized"
        );

        Ok(Self {
            device,
            config,
            channels,
        })
    }

    /// Record for the given duration, blocking the calling thread
    ///
    /// Returns the captured samples, truncated to `duration_secs *
    /// sample_rate * channels` (the stream may deliver a trailing partial
    /// buffer beyond the requested window).
    ///
    /// # Errors
    ///
    /// Returns error if the duration is zero or the stream fails to open,
    /// start, or report data.
    pub fn record(&self, duration_secs: u32) -> Result<Vec<f32>> {
        if duration_secs == 0 {
            return Err(Error::Config(
                "recording duration must be positive".to_string(),
            ));
        }

        let buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let stream_error = Arc::new(Mutex::new(None::<String>));

        let buffer_cb = Arc::clone(&buffer);
        let error_cb = Arc::clone(&stream_error);
        let device_channels = usize::from(self.config.channels);
        let want_channels = usize::from(self.channels);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let Ok(mut buf) = buffer_cb.lock() else {
                        return;
                    };
                    if device_channels > want_channels && want_channels == 1 {
                        // Collapse frames to mono
                        #[allow(clippy::cast_precision_loss)]
                        buf.extend(data.chunks(device_channels).map(|frame| {
                            frame.iter().sum::<f32>() / device_channels as f32
                        }));
                    } else {
                        buf.extend_from_slice(data);
                    }
                },
                move |err| {
                    tracing::error!(error = %err, "audio capture error");
                    if let Ok(mut slot) = error_cb.lock() {
                        *slot = Some(err.to_string());
                    }
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        std::thread::sleep(Duration::from_secs(u64::from(duration_secs)));
        drop(stream);

        if let Some(msg) = stream_error.lock().ok().and_then(|slot| slot.clone()) {
            return Err(Error::Audio(msg));
        }

        let mut samples = buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default();

        let expected =
            duration_secs as usize * self.config.sample_rate.0 as usize * want_channels;
        samples.truncate(expected);

        tracing::debug!(samples = samples.len(), "recording captured");
        Ok(samples)
    }

    /// Get the sample rate
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Get the requested channel count
    #[must_use]
    pub const fn channels(&self) -> u16 {
        self.channels
    }
}

/// Record from the default input device and persist the result
///
/// One-shot convenience used by the dictation pipeline: blocks for the full
/// duration, then writes the capture to a uniquely named temp file and
/// returns its absolute path.
///
/// # Errors
///
/// Returns error if capture or the WAV write fails.
pub fn record_to_file(duration_secs: u32, sample_rate: u32, channels: u16) -> Result<PathBuf> {
    let capture = AudioCapture::new(sample_rate, channels)?;
    let samples = capture.record(duration_secs)?;
    write_recording(&samples, capture.sample_rate(), capture.channels())
}

/// Write f32 samples to a uniquely named WAV file in the temp directory
///
/// The file is uncompressed 32-bit float at the given rate. The name keeps
/// the original `record_<unix-secs>` shape but appends a random fragment so
/// two captures within the same second cannot overwrite each other.
///
/// # Errors
///
/// Returns error if WAV encoding or the file write fails.
pub fn write_recording(samples: &[f32], sample_rate: u32, channels: u16) -> Result<PathBuf> {
    let path = recording_path();

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer =
        hound::WavWriter::create(&path, spec).map_err(|e| Error::Audio(e.to_string()))?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| Error::Audio(e.to_string()))?;
    }

    writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;

    tracing::debug!(path = %path.display(), samples = samples.len(), "recording written");
    Ok(path)
}

/// Unique recording path in the system temp directory
fn recording_path() -> PathBuf {
    let secs = chrono::Utc::now().timestamp();
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    std::env::temp_dir().join(format!("{RECORDING_PREFIX}{secs}_{}.wav", &nonce[..8]))
}
