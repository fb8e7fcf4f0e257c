//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use parlo::voice::{write_recording, ModelTier, Transcriber};
use parlo::{Error, SAMPLE_RATE};

mod common;

use common::{generate_silence, generate_sine_samples};

#[test]
fn write_recording_preserves_sample_count_and_mono_layout() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let path = write_recording(&samples, SAMPLE_RATE, 1).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.sample_format, hound::SampleFormat::Float);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(reader.len() as usize, samples.len());

    std::fs::remove_file(path).unwrap();
}

#[test]
fn write_recording_roundtrips_float_samples() {
    let original: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let path = write_recording(&original, SAMPLE_RATE, 1).unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    let read_back: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
    assert_eq!(read_back, original);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn recordings_in_the_same_second_get_distinct_files() {
    let samples = generate_silence(0.01);
    let a = write_recording(&samples, SAMPLE_RATE, 1).unwrap();
    let b = write_recording(&samples, SAMPLE_RATE, 1).unwrap();

    assert_ne!(a, b);
    assert!(a.exists());
    assert!(b.exists());

    std::fs::remove_file(a).unwrap();
    std::fs::remove_file(b).unwrap();
}

#[test]
fn recording_names_keep_the_record_prefix() {
    let samples = generate_silence(0.01);
    let path = write_recording(&samples, SAMPLE_RATE, 1).unwrap();

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("record_"));
    assert!(name.ends_with(".wav"));

    std::fs::remove_file(path).unwrap();
}

#[test]
fn transcribe_missing_file_is_an_stt_error() {
    let transcriber = Transcriber::new(ModelTier::Tiny, "en", None);
    let err = transcriber
        .transcribe(std::path::Path::new("/nonexistent/never-there.wav"))
        .unwrap_err();
    assert!(matches!(err, Error::Stt(_)));
}

#[test]
fn transcribe_corrupt_file_is_an_stt_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.wav");
    std::fs::write(&path, b"not a wav file at all").unwrap();

    let transcriber = Transcriber::new(ModelTier::Tiny, "en", None);
    let err = transcriber.transcribe(&path).unwrap_err();
    assert!(matches!(err, Error::Stt(_)));
}

#[test]
fn transcribe_rejects_wrong_sample_rate_before_loading_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("8k.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..800 {
        writer.write_sample(0.0_f32).unwrap();
    }
    writer.finalize().unwrap();

    let transcriber = Transcriber::new(ModelTier::Tiny, "en", None);
    let err = transcriber.transcribe(&path).unwrap_err();
    assert!(matches!(err, Error::Stt(_)));
}

#[test]
fn missing_model_dir_is_a_model_error() {
    let dir = tempfile::tempdir().unwrap();
    let samples = generate_silence(0.05);
    let path = write_recording(&samples, SAMPLE_RATE, 1).unwrap();

    // Valid audio, but the pointed-at model directory holds no ggml file
    let transcriber = Transcriber::new(ModelTier::Tiny, "en", Some(dir.path().to_path_buf()));
    let err = transcriber.transcribe(&path).unwrap_err();
    assert!(matches!(err, Error::ModelLoad(_)));

    std::fs::remove_file(path).unwrap();
}
