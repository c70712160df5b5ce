//! Calibration offset estimation.
//!
//! The resonator is assumed to produce the same sound level at the device in
//! every recording. The mean measured level of the valid files is therefore
//! the device's reading of that known level, and their difference is the
//! offset that turns device levels into SPL.

use resonometer_analysis::{AggregateStats, LevelUnit};
use resonometer_config::{MeterConfig, Resonator};
use serde::Serialize;

use crate::error::{CalibrationError, ValidationWarning};
use crate::file::FileResult;

/// Offset and uncertainty derived from one window width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    /// Resonator the offset refers to.
    pub resonator: String,
    /// Add this to device levels to obtain dB SPL.
    pub offset_db: f64,
    /// Combined standard uncertainty of `offset_db`.
    pub uncertainty_db: f64,
    /// Number of files the offset is based on.
    pub num_valid: usize,
    /// Mean of their maximum levels.
    pub mean_level_db: f64,
    /// Population standard deviation of their maximum levels.
    pub measured_std_db: f64,
    /// Unit of the measured levels.
    pub unit: LevelUnit,
    /// Files left out, with the reason.
    pub excluded: Vec<ValidationWarning>,
}

/// Turns per-file maxima into a calibration offset.
#[derive(Debug, Clone)]
pub struct CalibrationEstimator {
    resonator: Resonator,
    inter_measurement_std_db: f64,
}

impl CalibrationEstimator {
    /// Estimator for `resonator` with the given spread between recordings.
    pub fn new(resonator: Resonator, inter_measurement_std_db: f64) -> Self {
        Self {
            resonator,
            inter_measurement_std_db,
        }
    }

    /// Estimator using the resonator and spread of `config`.
    pub fn from_config(config: &MeterConfig) -> Self {
        Self::new(config.resonator.clone(), config.inter_measurement_std_db)
    }

    /// The resonator in use.
    pub fn resonator(&self) -> &Resonator {
        &self.resonator
    }

    /// Split `results` into files inside the accepted resonance range and
    /// warnings for the rest.
    pub fn partition<'r>(
        &self,
        results: &'r [FileResult],
    ) -> (Vec<&'r FileResult>, Vec<ValidationWarning>) {
        let range = self.resonator.accepted_range;
        let mut valid = Vec::with_capacity(results.len());
        let mut excluded = Vec::new();

        for result in results {
            if range.contains(result.resonance_hz) {
                valid.push(result);
            } else {
                let warning = ValidationWarning::ResonanceOutOfRange {
                    file: result.file_name.clone(),
                    resonance_hz: result.resonance_hz,
                    range,
                };
                tracing::warn!(%warning, "excluding file from calibration");
                excluded.push(warning);
            }
        }
        (valid, excluded)
    }

    /// Estimate the offset from the results of one window width.
    ///
    /// `offset = reference level - mean(max levels)` and
    /// `uncertainty = sqrt(std^2 / n + reference uncertainty^2)`.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::NoValidInput`] if no file lies in the accepted
    /// resonance range.
    pub fn estimate(&self, results: &[FileResult]) -> Result<CalibrationReport, CalibrationError> {
        let (valid, excluded) = self.partition(results);
        let Some(first) = valid.first() else {
            return Err(CalibrationError::NoValidInput { excluded });
        };

        let levels: Vec<f64> = valid.iter().map(|r| r.max_level_db).collect();
        let Some(stats) = AggregateStats::from_levels(&levels, first.unit) else {
            return Err(CalibrationError::NoValidInput { excluded });
        };

        let n = stats.count as f64;
        let offset_db = self.resonator.reference_level_db - stats.mean_db;
        let uncertainty_db = (self.inter_measurement_std_db.powi(2) / n
            + self.resonator.reference_uncertainty_db.powi(2))
        .sqrt();

        tracing::info!(
            resonator = %self.resonator.name,
            offset_db,
            uncertainty_db,
            valid = stats.count,
            excluded = excluded.len(),
            "calibration estimated"
        );

        Ok(CalibrationReport {
            resonator: self.resonator.name.clone(),
            offset_db,
            uncertainty_db,
            num_valid: stats.count,
            mean_level_db: stats.mean_db,
            measured_std_db: stats.std_db,
            unit: stats.unit,
            excluded,
        })
    }
}
