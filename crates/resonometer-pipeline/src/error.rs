//! Error and warning types of the pipeline.

use resonometer_analysis::{AnalysisError, FrequencyRange};
use resonometer_config::ConfigError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the input file list. Always fatal, raised before any
/// processing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    /// The file list is empty.
    #[error("no input files given")]
    NoFiles,

    /// A file does not carry a `.wav` extension.
    #[error("not a WAV file: {}", .0.display())]
    NotWav(PathBuf),
}

/// Failure to process a single file.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The file could not be read or decoded.
    #[error(transparent)]
    Io(#[from] resonometer_io::Error),

    /// An analysis stage rejected the signal.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The recording does not hold one complete analysis window.
    #[error("recording of {duration_ms:.3} ms is shorter than one {window_width_ms:.3} ms window")]
    SignalTooShort {
        /// Length of the recording.
        duration_ms: f64,
        /// Requested window width.
        window_width_ms: f64,
    },
}

/// A non-fatal finding reported alongside the results.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ValidationWarning {
    /// The detected resonance is outside the resonator's accepted range; the
    /// file is excluded from calibration.
    #[error("{file}: resonance {resonance_hz:.1} Hz outside accepted range {range}")]
    ResonanceOutOfRange {
        /// File name.
        file: String,
        /// Detected resonance frequency.
        resonance_hz: f64,
        /// Accepted range of the resonator.
        range: FrequencyRange,
    },
}

/// No file survived validation, so no offset can be computed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalibrationError {
    /// Every file was excluded (or there were none).
    #[error("no valid sound files ({} excluded)", excluded.len())]
    NoValidInput {
        /// Why each file was excluded.
        excluded: Vec<ValidationWarning>,
    },
}

/// Errors that end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad input file list.
    #[error(transparent)]
    Input(#[from] InputError),

    /// A file failed under [`ErrorPolicy::Abort`](resonometer_config::ErrorPolicy::Abort).
    #[error("failed to process '{}': {source}", file.display())]
    Processing {
        /// The file that failed.
        file: PathBuf,
        /// What went wrong.
        #[source]
        source: ProcessingError,
    },

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
