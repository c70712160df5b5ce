//! Serializable summary of a complete run.

use resonometer_config::MeterConfig;
use serde::Serialize;

use crate::aggregate::WidthRun;
use crate::calibrate::{CalibrationEstimator, CalibrationReport};
use crate::error::{CalibrationError, ValidationWarning};

/// Calibration result of one window width.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CalibrationOutcome {
    /// An offset was estimated.
    Calibrated(CalibrationReport),
    /// Every file was excluded.
    NoValidInput {
        /// Why each file was excluded.
        excluded: Vec<ValidationWarning>,
    },
}

impl From<Result<CalibrationReport, CalibrationError>> for CalibrationOutcome {
    fn from(result: Result<CalibrationReport, CalibrationError>) -> Self {
        match result {
            Ok(report) => CalibrationOutcome::Calibrated(report),
            Err(CalibrationError::NoValidInput { excluded }) => {
                CalibrationOutcome::NoValidInput { excluded }
            }
        }
    }
}

/// One window width with its optional calibration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidthReport {
    /// Per-file results, failures and statistics.
    #[serde(flatten)]
    pub run: WidthRun,
    /// Present for calibration runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationOutcome>,
}

/// Everything a run produced, ready for JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Version of the tool that produced the report.
    pub version: &'static str,
    /// Configuration the run used.
    pub config: MeterConfig,
    /// One entry per window width.
    pub widths: Vec<WidthReport>,
}

impl RunReport {
    /// Report for a level analysis without calibration.
    pub fn analysis(config: &MeterConfig, runs: Vec<WidthRun>) -> Self {
        Self::build(config, runs, None)
    }

    /// Report with a calibration per window width.
    pub fn calibration(config: &MeterConfig, runs: Vec<WidthRun>) -> Self {
        let estimator = CalibrationEstimator::from_config(config);
        Self::build(config, runs, Some(&estimator))
    }

    fn build(
        config: &MeterConfig,
        runs: Vec<WidthRun>,
        estimator: Option<&CalibrationEstimator>,
    ) -> Self {
        let widths = runs
            .into_iter()
            .map(|run| {
                let calibration = estimator.map(|e| e.estimate(&run.results).into());
                WidthReport { run, calibration }
            })
            .collect();
        Self {
            version: env!("CARGO_PKG_VERSION"),
            config: config.clone(),
            widths,
        }
    }
}
