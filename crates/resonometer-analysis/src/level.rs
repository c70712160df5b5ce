//! Power to decibel conversion
//!
//! Levels are `10 * log10(power / reference) + offset`. The reference depends
//! on the [`LevelUnit`]:
//!
//! - [`LevelUnit::FullScale`]: `max_amplitude^2 * sample_rate`, the power a
//!   constant full-scale signal would carry in one second of window. A sine of
//!   amplitude `A` therefore reads `20 * log10(A / max) - 3.01` dB FS.
//! - [`LevelUnit::Raw`]: `sample_rate`, a dimensional normalisation only.
//!
//! Non-positive powers have no level. [`LevelReference::to_db`] reports them
//! as an error; [`LevelReference::level_db`] returns `None`.

use crate::sliding::BandPower;
use crate::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Unit of a level value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LevelUnit {
    /// Relative to the full-scale power of the recording's sample format.
    #[default]
    FullScale,
    /// Relative to the sample rate only (raw sample units).
    Raw,
}

impl LevelUnit {
    /// Short suffix for display (`dBFS` or `dB`).
    pub fn suffix(&self) -> &'static str {
        match self {
            LevelUnit::FullScale => "dBFS",
            LevelUnit::Raw => "dB",
        }
    }
}

impl std::fmt::Display for LevelUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Reference power, unit and calibration offset for level conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelReference {
    unit: LevelUnit,
    reference_power: f64,
    offset_db: f64,
}

impl LevelReference {
    /// Full-scale reference: `max_amplitude^2 * sample_rate`.
    pub fn full_scale(max_amplitude: f64, sample_rate: f64) -> Self {
        Self {
            unit: LevelUnit::FullScale,
            reference_power: max_amplitude * max_amplitude * sample_rate,
            offset_db: 0.0,
        }
    }

    /// Raw reference: `sample_rate`.
    pub fn raw(sample_rate: f64) -> Self {
        Self {
            unit: LevelUnit::Raw,
            reference_power: sample_rate,
            offset_db: 0.0,
        }
    }

    /// Reference for `unit`; `max_amplitude` is ignored for [`LevelUnit::Raw`].
    pub fn for_unit(unit: LevelUnit, max_amplitude: f64, sample_rate: f64) -> Self {
        match unit {
            LevelUnit::FullScale => Self::full_scale(max_amplitude, sample_rate),
            LevelUnit::Raw => Self::raw(sample_rate),
        }
    }

    /// Add a calibration offset (dB) to every converted level.
    pub fn with_offset(mut self, offset_db: f64) -> Self {
        self.offset_db = offset_db;
        self
    }

    /// Unit of the produced levels.
    pub fn unit(&self) -> LevelUnit {
        self.unit
    }

    /// Reference power.
    pub fn reference_power(&self) -> f64 {
        self.reference_power
    }

    /// Calibration offset in dB.
    pub fn offset_db(&self) -> f64 {
        self.offset_db
    }

    /// Level of one power value, or `None` if it is not strictly positive.
    pub fn level_db(&self, power: f64) -> Option<f64> {
        (power > 0.0 && power.is_finite())
            .then(|| 10.0 * (power / self.reference_power).log10() + self.offset_db)
    }

    /// Convert the band power of step `index`.
    pub fn to_db(&self, power: f64, index: usize) -> Result<f64> {
        self.level_db(power).ok_or(AnalysisError::NonPositivePower { index, power })
    }

    /// Convert a sequence of band powers into a level series.
    ///
    /// Fails on the first power that is not strictly positive.
    pub fn convert_steps(&self, steps: impl IntoIterator<Item = BandPower>) -> Result<LevelSeries> {
        let points = steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| {
                Ok(LevelPoint {
                    time_s: step.time_s,
                    level_db: self.to_db(step.power, i)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LevelSeries {
            unit: self.unit,
            calibration_offset_db: self.offset_db,
            points,
        })
    }
}

/// One level sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPoint {
    /// Window start in seconds.
    pub time_s: f64,
    /// Level in dB.
    pub level_db: f64,
}

/// Level over time for one file at one window width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSeries {
    /// Unit of every `level_db`.
    pub unit: LevelUnit,
    /// Calibration offset already included in the levels.
    pub calibration_offset_db: f64,
    /// Samples in time order.
    pub points: Vec<LevelPoint>,
}

impl LevelSeries {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum level, or `None` for an empty series.
    pub fn max_level_db(&self) -> Option<f64> {
        self.points.iter().map(|p| p.level_db).reduce(f64::max)
    }

    /// The point holding the maximum level (first on ties).
    pub fn peak(&self) -> Option<LevelPoint> {
        let mut best: Option<LevelPoint> = None;
        for p in &self.points {
            match best {
                Some(b) if p.level_db <= b.level_db => {}
                _ => best = Some(*p),
            }
        }
        best
    }
}
