//! Resonometer Analysis - level estimation for Helmholtz resonator recordings
//!
//! This crate holds the signal-processing half of the calibration pipeline:
//!
//! - [`fft`] - real FFT wrapper with window functions and normalisation modes
//! - [`segment`] - time-window extraction (even sample counts)
//! - [`spectrum`] - one-sided power spectra and band integration
//! - [`resonance`] - global resonance frequency detection
//! - [`sliding`] - sliding-window band power around the resonance
//! - [`level`] - power to decibel conversion under a typed reference
//! - [`stats`] - mean / standard deviation of per-file maxima
//! - [`signal`] - small helpers for preparing raw recordings
//!
//! Everything operates on complete `f64` signals in raw sample units. Nothing
//! here touches the file system; see `resonometer-io` for WAV reading.
//!
//! ## Example
//!
//! ```rust,ignore
//! use resonometer_analysis::{detect_resonance, LevelReference, SlidingAnalyzer, SlidingParams};
//!
//! let f_res = detect_resonance(&signal, 44100.0)?;
//! let analyzer = SlidingAnalyzer::new(44100.0, f_res, SlidingParams::default())?;
//! let reference = LevelReference::full_scale(32767.0, 44100.0).with_offset(0.0);
//! let levels = reference.convert_steps(analyzer.steps(&signal))?;
//! println!("max level: {:.2} dB FS", levels.max_level_db().unwrap_or(f64::NAN));
//! ```

pub mod fft;
pub mod level;
pub mod resonance;
pub mod segment;
pub mod signal;
pub mod sliding;
pub mod spectrum;
pub mod stats;

pub use fft::{Fft, Normalization, Window};
pub use level::{LevelPoint, LevelReference, LevelSeries, LevelUnit};
pub use resonance::{LevelSpectrum, average_level_spectrum, detect_resonance};
pub use segment::{Segment, even_window_len, extract_segment};
pub use signal::{remove_dc, sine};
pub use sliding::{BandEdge, BandPower, SlidingAnalyzer, SlidingParams, SlidingSteps};
pub use spectrum::{FrequencyRange, Spectrum};
pub use stats::AggregateStats;

/// Errors produced by the analysis stages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// The signal has no samples.
    #[error("signal is empty")]
    EmptySignal,

    /// The window rounds down to fewer than two samples.
    #[error("window of {width_s} s is shorter than two samples at {sample_rate} Hz")]
    WindowTooShort {
        /// Requested window width in seconds.
        width_s: f64,
        /// Sampling rate in Hz.
        sample_rate: f64,
    },

    /// The requested segment extends past the end of the signal.
    #[error("segment [{start}, {end}) exceeds signal length {len}")]
    SegmentOutOfBounds {
        /// First sample of the segment.
        start: usize,
        /// One past the last sample of the segment.
        end: usize,
        /// Length of the signal.
        len: usize,
    },

    /// A configuration value is outside its valid domain.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A band power that cannot be expressed in decibels.
    #[error("band power {power} at step {index} is not positive; level is undefined")]
    NonPositivePower {
        /// Index of the offending step.
        index: usize,
        /// The power value.
        power: f64,
    },
}

impl AnalysisError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
