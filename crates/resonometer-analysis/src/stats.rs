//! Summary statistics over per-file maximum levels

use crate::level::LevelUnit;
use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of a set of levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of levels aggregated.
    pub count: usize,
    /// Arithmetic mean in dB.
    pub mean_db: f64,
    /// Population standard deviation in dB.
    pub std_db: f64,
    /// Unit shared by all aggregated levels.
    pub unit: LevelUnit,
}

impl AggregateStats {
    /// Aggregate `levels`; `None` if there are none.
    pub fn from_levels(levels: &[f64], unit: LevelUnit) -> Option<Self> {
        if levels.is_empty() {
            return None;
        }
        let n = levels.len() as f64;
        let mean_db = levels.iter().sum::<f64>() / n;
        let variance = levels.iter().map(|l| (l - mean_db).powi(2)).sum::<f64>() / n;
        Some(Self {
            count: levels.len(),
            mean_db,
            std_db: variance.sqrt(),
            unit,
        })
    }

    /// Standard error of the mean (`std / sqrt(count)`).
    pub fn standard_error_db(&self) -> f64 {
        self.std_db / (self.count as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_statistics() {
        let stats = AggregateStats::from_levels(&[-10.0, -12.0, -14.0, -12.0], LevelUnit::FullScale)
            .unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.mean_db + 12.0).abs() < 1e-12);
        assert!((stats.std_db - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!((stats.standard_error_db() - 2.0_f64.sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn single_level_has_zero_spread() {
        let stats = AggregateStats::from_levels(&[3.0], LevelUnit::Raw).unwrap();
        assert_eq!(stats.std_db, 0.0);
        assert_eq!(stats.unit, LevelUnit::Raw);
    }

    #[test]
    fn no_levels_no_stats() {
        assert!(AggregateStats::from_levels(&[], LevelUnit::FullScale).is_none());
    }
}
