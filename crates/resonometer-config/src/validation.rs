//! Configuration validation.
//!
//! All checks run; failures are collected so a user sees every problem in a
//! config file at once.
//!
//! # Example
//!
//! ```rust
//! use resonometer_config::{MeterConfig, ValidationError};
//!
//! let config = MeterConfig {
//!     step_fraction: 0.0,
//!     ..MeterConfig::default()
//! };
//! assert!(matches!(
//!     config.validate(),
//!     Err(ValidationError::NotPositive { .. })
//! ));
//! ```

use crate::MeterConfig;
use resonometer_analysis::FrequencyRange;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// No window width configured.
    #[error("at least one window width is required")]
    NoWindowWidths,

    /// Value must be strictly positive.
    #[error("'{param}' must be positive, got {value}")]
    NotPositive {
        /// Name of the setting.
        param: String,
        /// The rejected value.
        value: f64,
    },

    /// Value must not be negative.
    #[error("'{param}' must not be negative, got {value}")]
    Negative {
        /// Name of the setting.
        param: String,
        /// The rejected value.
        value: f64,
    },

    /// Value must be a finite number.
    #[error("'{param}' must be finite, got {value}")]
    NotFinite {
        /// Name of the setting.
        param: String,
        /// The rejected value.
        value: f64,
    },

    /// Range bounds are inverted.
    #[error("'{param}' has min {min} above max {max}")]
    InvertedRange {
        /// Name of the setting.
        param: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate every value of `config`.
pub fn validate_config(config: &MeterConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if config.window_widths_ms.is_empty() {
        errors.push(ValidationError::NoWindowWidths);
    }
    for &width in &config.window_widths_ms {
        check_positive(&mut errors, "window_widths_ms", width);
    }
    check_positive(&mut errors, "step_fraction", config.step_fraction);
    check_positive(&mut errors, "band_width_hz", config.band_width_hz);
    check_finite(&mut errors, "calibration_offset_db", config.calibration_offset_db);
    check_non_negative(
        &mut errors,
        "inter_measurement_std_db",
        config.inter_measurement_std_db,
    );
    if let Some(range) = config.spectrum_range_hz {
        check_range(&mut errors, "spectrum_range_hz", range);
    }

    let resonator = &config.resonator;
    check_finite(
        &mut errors,
        "resonator.reference_level_db",
        resonator.reference_level_db,
    );
    check_non_negative(
        &mut errors,
        "resonator.reference_uncertainty_db",
        resonator.reference_uncertainty_db,
    );
    check_range(
        &mut errors,
        "resonator.accepted_range",
        resonator.accepted_range,
    );

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

fn check_finite(errors: &mut Vec<ValidationError>, param: &str, value: f64) -> bool {
    if value.is_finite() {
        true
    } else {
        errors.push(ValidationError::NotFinite {
            param: param.to_string(),
            value,
        });
        false
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, param: &str, value: f64) {
    if check_finite(errors, param, value) && value <= 0.0 {
        errors.push(ValidationError::NotPositive {
            param: param.to_string(),
            value,
        });
    }
}

fn check_non_negative(errors: &mut Vec<ValidationError>, param: &str, value: f64) {
    if check_finite(errors, param, value) && value < 0.0 {
        errors.push(ValidationError::Negative {
            param: param.to_string(),
            value,
        });
    }
}

fn check_range(errors: &mut Vec<ValidationError>, param: &str, range: FrequencyRange) {
    let min_ok = check_finite(errors, param, range.min_hz);
    let max_ok = check_finite(errors, param, range.max_hz);
    if min_ok && max_ok && range.min_hz > range.max_hz {
        errors.push(ValidationError::InvertedRange {
            param: param.to_string(),
            min: range.min_hz,
            max: range.max_hz,
        });
    }
}
