//! Integration tests for resonometer-io WAV input.

use resonometer_io::{Error, WavFormat, WavSpec, read_recording, write_wav};
use tempfile::TempDir;

/// Generate a sine wave in raw units.
fn sine_wave(sample_rate: u32, freq_hz: f64, num_samples: usize, amplitude: f64) -> Vec<f64> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / f64::from(sample_rate);
            amplitude * (2.0 * std::f64::consts::PI * freq_hz * t).sin()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Recording input
// ---------------------------------------------------------------------------

#[test]
fn recording_keeps_name_and_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bottle_01.wav");
    let samples = sine_wave(44100, 170.0, 4410, 16000.0);
    write_wav(&path, &samples, WavSpec::default()).unwrap();

    let recording = read_recording(&path).unwrap();
    assert_eq!(recording.name, "bottle_01.wav");
    assert_eq!(recording.format, WavFormat::Pcm);
    assert_eq!(recording.samples.len(), 4410);
    assert!((recording.duration_secs() - 0.1).abs() < 1e-9);
}

#[test]
fn recording_24_bit_full_scale() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deep.wav");
    let spec = WavSpec {
        bits_per_sample: 24,
        sample_rate: 48000,
        ..WavSpec::default()
    };
    let samples = sine_wave(48000, 170.0, 480, 4_000_000.0);
    write_wav(&path, &samples, spec).unwrap();

    let recording = read_recording(&path).unwrap();
    assert_eq!(recording.full_scale(), 8388607.0);
    for (a, b) in samples.iter().zip(&recording.samples) {
        assert!((a - b).abs() <= 0.5, "sample mismatch: {a} vs {b}");
    }
}

#[test]
fn recording_float_full_scale_is_one() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("float.wav");
    let spec = WavSpec {
        bits_per_sample: 32,
        format: WavFormat::IeeeFloat,
        ..WavSpec::default()
    };
    let samples = sine_wave(44100, 170.0, 441, 0.5);
    write_wav(&path, &samples, spec).unwrap();

    let recording = read_recording(&path).unwrap();
    assert_eq!(recording.full_scale(), 1.0);
    for (a, b) in samples.iter().zip(&recording.samples) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn garbage_file_is_a_wav_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.wav");
    std::fs::write(&path, b"definitely not RIFF data").unwrap();

    assert!(matches!(read_recording(&path), Err(Error::Wav(_))));
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(read_recording(dir.path().join("absent.wav")).is_err());
}

// Multi-channel input
// ---------------------------------------------------------------------------

#[test]
fn stereo_recording_counts_frames_per_channel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stereo.wav");
    let spec = WavSpec {
        channels: 2,
        sample_rate: 8000,
        ..WavSpec::default()
    };
    let interleaved: Vec<f64> = (0..8000).flat_map(|i| [f64::from(i % 100), -7.0]).collect();
    write_wav(&path, &interleaved, spec).unwrap();

    let recording = read_recording(&path).unwrap();
    assert_eq!(recording.channels, 2);
    assert_eq!(recording.samples.len(), 8000);
    assert_eq!(recording.bits_per_sample, 16);
    assert!((recording.duration_secs() - 1.0).abs() < 1e-9);
    assert!(recording.samples.iter().all(|&s| s >= 0.0));
}
