//! WAV file reading and writing.
//!
//! Samples are kept in raw units: integer PCM values are converted to `f64`
//! without scaling, so a 16-bit file yields values in `[-32768, 32767]`. The
//! level reference in full-scale mode is derived from the bit depth instead
//! (see [`full_scale_value`]).

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use serde::Serialize;
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

impl std::fmt::Display for WavFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WavFormat::Pcm => "PCM",
            WavFormat::IeeeFloat => "IEEE Float",
        })
    }
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        }
    }
}

/// Largest representable sample magnitude for a format and bit depth.
///
/// `2^(bits-1) - 1` for integer PCM (32767 for 16 bit), `1.0` for float.
pub fn full_scale_value(format: WavFormat, bits_per_sample: u16) -> f64 {
    match format {
        WavFormat::IeeeFloat => 1.0,
        WavFormat::Pcm => {
            let bits = bits_per_sample.clamp(1, 63);
            ((1i64 << (bits - 1)) - 1) as f64
        }
    }
}

/// A mono recording in raw sample units.
#[derive(Debug, Clone)]
pub struct Recording {
    /// File name (without directory).
    pub name: String,
    /// First-channel samples in raw units.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count of the source file.
    pub channels: u16,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Sample encoding.
    pub format: WavFormat,
}

impl Recording {
    /// Largest representable sample magnitude of the source format.
    pub fn full_scale(&self) -> f64 {
        full_scale_value(self.format, self.bits_per_sample)
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Read a WAV file as a mono [`Recording`].
///
/// Multi-channel files are reduced to their first channel. Integer samples
/// keep their raw values.
///
/// # Example
/// ```ignore
/// let recording = read_recording("bottle.wav")?;
/// println!("Loaded {} samples at {} Hz", recording.samples.len(), recording.sample_rate);
/// ```
pub fn read_recording<P: AsRef<Path>>(path: P) -> Result<Recording> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(Error::UnsupportedFormat("zero channels".to_string()));
    }

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => reader
            .into_samples::<i32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
    };

    let samples: Vec<f64> = if channels > 1 {
        interleaved.chunks(channels).map(|frame| frame[0]).collect()
    } else {
        interleaved
    };
    if samples.is_empty() {
        return Err(Error::NoSamples);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(
        file = %name,
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = samples.len(),
        "read recording"
    );

    Ok(Recording {
        name,
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        format: spec.sample_format.into(),
    })
}

/// WAV file specification for writing.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (e.g., 16, 24, 32).
    pub bits_per_sample: u16,
    /// Sample encoding.
    pub format: WavFormat,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            format: WavFormat::Pcm,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: match spec.format {
                WavFormat::Pcm => SampleFormat::Int,
                WavFormat::IeeeFloat => SampleFormat::Float,
            },
        }
    }
}

/// Write interleaved raw samples to a WAV file.
///
/// Integer formats round and clamp to the representable range.
///
/// # Example
/// ```ignore
/// let samples = vec![0.0; 44100]; // 1 second of silence
/// write_wav("output.wav", &samples, WavSpec::default())?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f64], spec: WavSpec) -> Result<()> {
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    match spec.format {
        WavFormat::IeeeFloat => {
            for &sample in samples {
                writer.write_sample(sample as f32)?;
            }
        }
        WavFormat::Pcm => {
            let max_val = full_scale_value(spec.format, spec.bits_per_sample);
            for &sample in samples {
                let int_sample = sample.round().clamp(-max_val - 1.0, max_val) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_full_scale_values() {
        assert_eq!(full_scale_value(WavFormat::Pcm, 8), 127.0);
        assert_eq!(full_scale_value(WavFormat::Pcm, 16), 32767.0);
        assert_eq!(full_scale_value(WavFormat::Pcm, 24), 8388607.0);
        assert_eq!(full_scale_value(WavFormat::Pcm, 32), 2147483647.0);
        assert_eq!(full_scale_value(WavFormat::IeeeFloat, 32), 1.0);
    }

    #[test]
    fn test_roundtrip_i16_raw_units() {
        let samples: Vec<f64> = (0..1000)
            .map(|i| ((i as f64 / 50.0).sin() * 20000.0).round())
            .collect();
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, WavSpec::default()).unwrap();

        let recording = read_recording(file.path()).unwrap();
        assert_eq!(recording.sample_rate, 44100);
        assert_eq!(recording.bits_per_sample, 16);
        assert_eq!(recording.full_scale(), 32767.0);
        assert_eq!(recording.samples, samples);
    }

    #[test]
    fn test_first_channel_is_kept() {
        // left ramps up, right is constant
        let interleaved: Vec<f64> = (0..200).flat_map(|i| [i as f64, -500.0]).collect();
        let spec = WavSpec {
            channels: 2,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &interleaved, spec).unwrap();

        let recording = read_recording(file.path()).unwrap();
        assert_eq!(recording.channels, 2);
        assert_eq!(recording.samples.len(), 200);
        assert_eq!(recording.samples[0], 0.0);
        assert_eq!(recording.samples[199], 199.0);
    }

    #[test]
    fn test_pcm_write_clamps() {
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[1e9, -1e9, 12.4], WavSpec::default()).unwrap();
        let recording = read_recording(file.path()).unwrap();
        assert_eq!(recording.samples, vec![32767.0, -32768.0, 12.0]);
    }

    #[test]
    fn test_format_labels() {
        assert_eq!(WavFormat::Pcm.to_string(), "PCM");
        assert_eq!(WavFormat::IeeeFloat.to_string(), "IEEE Float");
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[], WavSpec::default()).unwrap();
        assert!(matches!(read_recording(file.path()), Err(Error::NoSamples)));
    }
}
