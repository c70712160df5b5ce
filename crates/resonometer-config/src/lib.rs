//! Configuration and resonator presets for resonometer.
//!
//! A run of the level meter is fully described by one immutable
//! [`MeterConfig`] record. It is plain data: load it from TOML, adjust it
//! programmatically, validate it, then pass it by reference into the pipeline.
//!
//! # Features
//!
//! - **Meter configuration**: window widths, step, band width, level unit,
//!   calibration offset, error policy
//! - **Resonators**: reference level, uncertainty and accepted resonance range
//!   of the physical resonator used for calibration
//! - **Factory resonators**: built-in presets such as `beer-bottle`
//! - **Validation**: range checks collected into a single error
//! - **Paths**: platform-specific user configuration directory
//!
//! # Example
//!
//! ```rust,no_run
//! use resonometer_config::{MeterConfig, ErrorPolicy, resonator_preset};
//!
//! let mut config = MeterConfig::load("meter.toml").unwrap();
//! config.error_policy = ErrorPolicy::Abort;
//! config.resonator = resonator_preset("beer-bottle").unwrap();
//! config.validate().unwrap();
//! ```

mod error;
mod meter_config;

/// Platform-specific paths for configuration and user resonators.
pub mod paths;

/// Configuration validation.
pub mod validation;

/// Factory resonators bundled with the library.
pub mod resonators;

pub use error::ConfigError;
pub use meter_config::{ErrorPolicy, MeterConfig, Resonator};
pub use paths::{
    default_config_path, find_resonator, find_resonator_in, user_config_dir, user_resonators_dir,
};
pub use resonators::{RESONATOR_PRESET_NAMES, resonator_preset, resonator_presets};
pub use validation::{ValidationError, ValidationResult, validate_config};

/// Re-export of the analysis types that appear in the configuration.
pub use resonometer_analysis::{BandEdge, FrequencyRange, LevelUnit, Window};
