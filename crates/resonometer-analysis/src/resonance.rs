//! Global resonance frequency detection
//!
//! The bottle tone is sustained and stable over the whole recording, so the
//! resonance is estimated once from the spectrum of the complete signal and
//! then held fixed while the sliding analyzer steps through the file.

use crate::level::{LevelReference, LevelUnit};
use crate::spectrum::{FrequencyRange, Spectrum};
use crate::{AnalysisError, Result};
use serde::Serialize;

/// Frequency of maximum power in the full-length periodogram of `signal`.
///
/// `signal` should already be DC-free; otherwise the DC bin may win. The
/// returned frequency is non-negative and quantised to `sample_rate / len`.
pub fn detect_resonance(signal: &[f64], sample_rate: f64) -> Result<f64> {
    check_sample_rate(sample_rate)?;
    if signal.is_empty() {
        return Err(AnalysisError::EmptySignal);
    }

    let spectrum = Spectrum::periodogram(signal, sample_rate);
    let (bin, freq) = spectrum.peak().ok_or(AnalysisError::EmptySignal)?;
    tracing::debug!(
        bin,
        freq_hz = freq,
        resolution_hz = sample_rate / signal.len() as f64,
        "resonance peak"
    );
    Ok(freq.abs())
}

/// Average level per frequency over a range, from the full-length periodogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSpectrum {
    /// Unit of `levels_db`.
    pub unit: LevelUnit,
    /// Calibration offset already included in `levels_db`.
    pub calibration_offset_db: f64,
    /// Bin frequencies in Hz.
    pub frequencies_hz: Vec<f64>,
    /// Level per bin in dB; `None` for bins without power.
    pub levels_db: Vec<Option<f64>>,
}

impl LevelSpectrum {
    /// Frequency and level of the loudest bin.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.frequencies_hz
            .iter()
            .zip(&self.levels_db)
            .filter_map(|(&f, &l)| Some((f, l?)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Level of every periodogram bin of `signal` within `range`.
///
/// The periodogram is the one used by [`detect_resonance`]; each bin is
/// converted with `reference`, so the same unit and offset apply as for the
/// sliding level series. Bins with zero power, such as the DC bin of a
/// DC-free signal, have no level and are kept as `None`.
pub fn average_level_spectrum(
    signal: &[f64],
    sample_rate: f64,
    reference: &LevelReference,
    range: FrequencyRange,
) -> Result<LevelSpectrum> {
    check_sample_rate(sample_rate)?;
    if signal.is_empty() {
        return Err(AnalysisError::EmptySignal);
    }

    let spectrum = Spectrum::periodogram(signal, sample_rate).restrict(range);
    let levels_db = spectrum
        .power
        .iter()
        .map(|&p| reference.level_db(p))
        .collect();

    Ok(LevelSpectrum {
        unit: reference.unit(),
        calibration_offset_db: reference.offset_db(),
        frequencies_hz: spectrum.frequencies,
        levels_db,
    })
}

fn check_sample_rate(sample_rate: f64) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::invalid(
            "sample_rate",
            format!("must be positive, got {sample_rate}"),
        ))
    }
}
