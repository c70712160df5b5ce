//! Single-file level analysis.

use std::path::Path;

use resonometer_analysis::{
    LevelReference, LevelSeries, LevelSpectrum, LevelUnit, SlidingAnalyzer,
    average_level_spectrum, detect_resonance, remove_dc,
};
use resonometer_config::MeterConfig;
use resonometer_io::{Recording, read_recording};
use serde::Serialize;

use crate::error::ProcessingError;

/// Outcome of analysing one recording at one window width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    /// File name (without directory).
    pub file_name: String,
    /// Analysis window width in seconds.
    pub window_width_s: f64,
    /// Highest level of the sliding series.
    pub max_level_db: f64,
    /// Time of the highest level.
    pub max_level_time_s: f64,
    /// Detected resonance frequency.
    pub resonance_hz: f64,
    /// Largest representable sample value of the source format.
    pub full_scale: f64,
    /// Sampling rate in Hz.
    pub sample_rate: u32,
    /// Unit of every level in this result.
    pub unit: LevelUnit,
    /// Level at every time step.
    pub level_series: LevelSeries,
    /// Average level spectrum, when a spectrum range is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrum: Option<LevelSpectrum>,
}

/// Read `path` and analyse it at `window_width_ms`.
pub fn analyze_file(
    path: &Path,
    window_width_ms: f64,
    config: &MeterConfig,
) -> Result<FileResult, ProcessingError> {
    let recording = read_recording(path)?;
    analyze_recording(&recording, window_width_ms, config)
}

/// Analyse an in-memory recording at `window_width_ms`.
///
/// The first channel is DC-corrected, its resonance detected from the full
/// spectrum, and the band level tracked with a sliding window. The maximum
/// of that series is the file's level.
pub fn analyze_recording(
    recording: &Recording,
    window_width_ms: f64,
    config: &MeterConfig,
) -> Result<FileResult, ProcessingError> {
    let sample_rate = f64::from(recording.sample_rate);
    let params = config.sliding_params(window_width_ms);

    let mut signal = recording.samples.clone();
    let dc = remove_dc(&mut signal);

    let resonance_hz = detect_resonance(&signal, sample_rate)?;
    let analyzer = SlidingAnalyzer::new(sample_rate, resonance_hz, params)?;

    let reference = LevelReference::for_unit(config.level_unit, recording.full_scale(), sample_rate)
        .with_offset(config.calibration_offset_db);
    let level_series = reference.convert_steps(analyzer.steps(&signal))?;
    let peak = level_series
        .peak()
        .ok_or_else(|| ProcessingError::SignalTooShort {
            duration_ms: recording.duration_secs() * 1e3,
            window_width_ms,
        })?;

    // Diagnostic only: bins without power carry no level but never fail the file.
    let spectrum = config
        .spectrum_range_hz
        .map(|range| average_level_spectrum(&signal, sample_rate, &reference, range))
        .transpose()?;

    tracing::debug!(
        file = %recording.name,
        dc,
        steps = level_series.len(),
        band_bins = ?analyzer.band_bins(),
        "sliding levels computed"
    );
    tracing::info!(
        file = %recording.name,
        width_ms = window_width_ms,
        resonance_hz,
        max_level_db = peak.level_db,
        unit = %config.level_unit,
        "file analysed"
    );

    Ok(FileResult {
        file_name: recording.name.clone(),
        window_width_s: params.window_width_s,
        max_level_db: peak.level_db,
        max_level_time_s: peak.time_s,
        resonance_hz,
        full_scale: recording.full_scale(),
        sample_rate: recording.sample_rate,
        unit: config.level_unit,
        level_series,
        spectrum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonometer_analysis::{BandEdge, FrequencyRange, sine};
    use resonometer_io::WavFormat;

    fn recording(samples: Vec<f64>) -> Recording {
        Recording {
            name: "tone.wav".to_string(),
            samples,
            sample_rate: 44100,
            channels: 1,
            bits_per_sample: 16,
            format: WavFormat::Pcm,
        }
    }

    #[test]
    fn half_scale_tone() {
        let rec = recording(sine(170.0, 44100.0, 44100, 32767.0 / 2.0));
        let result = analyze_recording(&rec, 35.0, &MeterConfig::default()).unwrap();

        assert!((result.resonance_hz - 170.0).abs() <= 1.0);
        assert!(
            (result.max_level_db + 9.03).abs() < 0.5,
            "got {}",
            result.max_level_db
        );
        assert_eq!(result.unit, LevelUnit::FullScale);
        assert_eq!(result.level_series.len(), 56);
        assert_eq!(result.full_scale, 32767.0);
        assert!(result.spectrum.is_none());
    }

    #[test]
    fn offset_shifts_every_level() {
        let rec = recording(sine(170.0, 44100.0, 44100, 10000.0));
        let plain = analyze_recording(&rec, 35.0, &MeterConfig::default()).unwrap();
        let config = MeterConfig {
            calibration_offset_db: 100.0,
            ..MeterConfig::default()
        };
        let shifted = analyze_recording(&rec, 35.0, &config).unwrap();
        assert!((shifted.max_level_db - plain.max_level_db - 100.0).abs() < 1e-9);
        assert_eq!(shifted.level_series.calibration_offset_db, 100.0);
    }

    #[test]
    fn too_short_for_one_window() {
        let rec = recording(sine(170.0, 44100.0, 1000, 10000.0));
        let err = analyze_recording(&rec, 35.0, &MeterConfig::default()).unwrap_err();
        assert!(
            matches!(
                err,
                ProcessingError::SignalTooShort { window_width_ms, .. } if window_width_ms == 35.0
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn just_under_one_window_reports_durations() {
        // 1542 samples is the even window length, but 34.97 ms < 35 ms.
        let rec = recording(sine(170.0, 44100.0, 1542, 10000.0));
        let err = analyze_recording(&rec, 35.0, &MeterConfig::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("34.966 ms"), "got: {msg}");
        assert!(msg.contains("35.000 ms"), "got: {msg}");
    }

    #[test]
    fn silence_is_an_analysis_error() {
        let rec = recording(vec![0.0; 4410]);
        let err = analyze_recording(&rec, 35.0, &MeterConfig::default()).unwrap_err();
        assert!(matches!(err, ProcessingError::Analysis(_)), "got {err:?}");
    }

    #[test]
    fn spectrum_is_attached_when_configured() {
        let samples = sine(170.0, 44100.0, 44100, 10000.0)
            .into_iter()
            .map(f64::round)
            .collect();
        let rec = recording(samples);
        let config = MeterConfig {
            spectrum_range_hz: Some(FrequencyRange::new(100.0, 300.0)),
            ..MeterConfig::default()
        };
        let result = analyze_recording(&rec, 35.0, &config).unwrap();
        let spectrum = result.spectrum.unwrap();
        assert_eq!(spectrum.frequencies_hz.len(), 201);
        assert_eq!(spectrum.unit, LevelUnit::FullScale);
    }

    #[test]
    fn spectrum_from_dc_does_not_change_the_level() {
        let samples: Vec<f64> = sine(170.0, 44100.0, 44100, 10000.0)
            .into_iter()
            .map(f64::round)
            .collect();
        let rec = recording(samples);
        let plain = analyze_recording(&rec, 35.0, &MeterConfig::default()).unwrap();
        let config = MeterConfig {
            spectrum_range_hz: Some(FrequencyRange::new(0.0, 300.0)),
            ..MeterConfig::default()
        };

        let result = analyze_recording(&rec, 35.0, &config).unwrap();
        assert_eq!(result.max_level_db, plain.max_level_db);

        let spectrum = result.spectrum.unwrap();
        assert_eq!(spectrum.frequencies_hz.len(), 301);
        assert_eq!(spectrum.frequencies_hz[0], 0.0);
        assert!(spectrum.levels_db.iter().flatten().all(|l| l.is_finite()));
        assert_eq!(spectrum.peak().map(|(f, _)| f), Some(170.0));
    }

    #[test]
    fn low_resonance_saturates_lower_band_edge() {
        // 30 Hz at 1 kHz with a 100 ms window: the 120 Hz band reaches below
        // DC, so the legacy extra bin has nowhere to go.
        let rec = Recording {
            sample_rate: 1000,
            ..recording(sine(30.0, 1000.0, 1000, 32767.0 / 2.0))
        };
        let legacy = analyze_recording(&rec, 100.0, &MeterConfig::default()).unwrap();
        let symmetric_config = MeterConfig {
            band_edge: BandEdge::Symmetric,
            ..MeterConfig::default()
        };
        let symmetric = analyze_recording(&rec, 100.0, &symmetric_config).unwrap();

        assert_eq!(legacy.resonance_hz, 30.0);
        assert_eq!(legacy.level_series, symmetric.level_series);
        let expected = 10.0 * (0.25f64 / 2.0).log10();
        assert!(
            (legacy.max_level_db - expected).abs() < 1e-6,
            "got {}",
            legacy.max_level_db
        );
    }
}
