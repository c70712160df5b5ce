//! Meter configuration file format and operations.

use resonometer_analysis::{BandEdge, FrequencyRange, LevelUnit, SlidingParams, Window};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_config};

/// What to do when a single file fails to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Stop the run and return the error.
    Abort,
    /// Log a warning, record the failure and continue with the next file.
    #[default]
    Skip,
}

/// A physical resonator with a known sound level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resonator {
    /// Name of the resonator type.
    pub name: String,

    /// Optional description (bottle model, distance, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Empirical sound level of the resonator in dB SPL.
    pub reference_level_db: f64,

    /// Standard uncertainty of `reference_level_db` in dB.
    pub reference_uncertainty_db: f64,

    /// Resonance frequencies accepted as a valid recording of this resonator.
    pub accepted_range: FrequencyRange,
}

impl Default for Resonator {
    fn default() -> Self {
        crate::resonators::beer_bottle()
    }
}

/// Complete configuration of one level-meter run.
///
/// # TOML Format
///
/// ```toml
/// window_widths_ms = [35.0]
/// step_fraction = 0.5
/// band_width_hz = 120.0
/// level_unit = "full-scale"
/// calibration_offset_db = 0.0
/// band_edge = "legacy"
/// window = "rectangular"
/// error_policy = "skip"
/// inter_measurement_std_db = 3.0
///
/// [spectrum_range_hz]
/// min_hz = 100.0
/// max_hz = 300.0
///
/// [resonator]
/// name = "beer-bottle"
/// reference_level_db = 92.79
/// reference_uncertainty_db = 0.5
/// accepted_range = { min_hz = 160.0, max_hz = 180.0 }
/// ```
///
/// Every key is optional; missing keys take the defaults shown above.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeterConfig {
    /// Window widths to evaluate, in milliseconds.
    pub window_widths_ms: Vec<f64>,

    /// Step between windows as a multiple of the window width.
    pub step_fraction: f64,

    /// Width of the integration band around the resonance, in Hz.
    pub band_width_hz: f64,

    /// Reference used for level conversion.
    pub level_unit: LevelUnit,

    /// Offset added to every level, in dB.
    pub calibration_offset_db: f64,

    /// Lower band edge rule.
    pub band_edge: BandEdge,

    /// Window function applied to each analysis window.
    pub window: Window,

    /// Per-file error handling.
    pub error_policy: ErrorPolicy,

    /// Empirical standard deviation between independent recordings, in dB.
    pub inter_measurement_std_db: f64,

    /// Frequency range of the optional average-level spectrum per file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrum_range_hz: Option<FrequencyRange>,

    /// Resonator the recordings were made with.
    pub resonator: Resonator,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            window_widths_ms: vec![35.0],
            step_fraction: 0.5,
            band_width_hz: 120.0,
            level_unit: LevelUnit::FullScale,
            calibration_offset_db: 0.0,
            band_edge: BandEdge::Legacy,
            window: Window::Rectangular,
            error_policy: ErrorPolicy::Skip,
            inter_measurement_std_db: 3.0,
            spectrum_range_hz: None,
            resonator: Resonator::default(),
        }
    }
}

impl MeterConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value against its valid domain.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_config(self)
    }

    /// Sliding analysis parameters for one window width (milliseconds).
    pub fn sliding_params(&self, window_width_ms: f64) -> SlidingParams {
        SlidingParams {
            window_width_s: window_width_ms * 1e-3,
            step_fraction: self.step_fraction,
            band_width_hz: self.band_width_hz,
            band_edge: self.band_edge,
            window: self.window,
        }
    }

    /// Builder: replace the window widths.
    pub fn with_window_widths_ms(mut self, widths: impl IntoIterator<Item = f64>) -> Self {
        self.window_widths_ms = widths.into_iter().collect();
        self
    }

    /// Builder: set the level unit.
    pub fn with_level_unit(mut self, unit: LevelUnit) -> Self {
        self.level_unit = unit;
        self
    }

    /// Builder: set the error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Builder: set the resonator.
    pub fn with_resonator(mut self, resonator: Resonator) -> Self {
        self.resonator = resonator;
        self
    }
}
