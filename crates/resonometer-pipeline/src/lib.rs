//! Multi-file level aggregation and SPL calibration.
//!
//! Ties the analysis, I/O and configuration crates together:
//!
//! - [`analyze_file`] / [`analyze_recording`] - resonance and maximum band
//!   level of one recording at one window width
//! - [`Aggregator`] - every file at every configured width, with the
//!   configured [`ErrorPolicy`](resonometer_config::ErrorPolicy) applied to
//!   per-file failures
//! - [`CalibrationEstimator`] - resonance-range filtering, offset and
//!   combined uncertainty
//! - [`RunReport`] - serializable summary of a run
//!
//! Runs are stateless: the same files and [`MeterConfig`](resonometer_config::MeterConfig)
//! always give the same report.
//!
//! ## Example
//!
//! ```rust,no_run
//! use resonometer_config::MeterConfig;
//! use resonometer_pipeline::{Aggregator, CalibrationEstimator};
//!
//! let config = MeterConfig::default();
//! let runs = Aggregator::new(&config).run(&["take1.wav", "take2.wav"])?;
//! let report = CalibrationEstimator::from_config(&config).estimate(&runs[0].results)?;
//! println!("offset {:.2} dB +- {:.2} dB", report.offset_db, report.uncertainty_db);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod calibrate;
pub mod error;
pub mod file;
pub mod report;

pub use aggregate::{Aggregator, FileEvent, FileFailure, WidthRun, validate_inputs};
pub use calibrate::{CalibrationEstimator, CalibrationReport};
pub use error::{CalibrationError, InputError, PipelineError, ProcessingError, ValidationWarning};
pub use file::{FileResult, analyze_file, analyze_recording};
pub use report::{CalibrationOutcome, RunReport, WidthReport};
