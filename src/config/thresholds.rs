// src/config/thresholds.rs
//
// Pass/fail policy applied to each metric.

use serde::{Deserialize, Serialize};

use crate::report::Metric;

/// Acceptance bounds per metric. All comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceThresholds {
    /// Integrated loudness must be above this (LUFS)
    pub lufs_min: f64,
    /// Integrated loudness must be below this (LUFS)
    pub lufs_max: f64,
    /// Loudness range must be below this (LU)
    pub lufs_range_max: f64,
    /// Interruption ratio must be above this
    pub interruptions_min: f64,
    /// Intelligibility score must be above this
    pub intelligibility_min: f64,
}

impl Default for AcceptanceThresholds {
    fn default() -> Self {
        Self {
            lufs_min: -27.0,
            lufs_max: -17.0,
            lufs_range_max: 5.0,
            interruptions_min: 0.2,
            intelligibility_min: 3.5,
        }
    }
}

impl AcceptanceThresholds {
    /// Whether an unrounded metric value passes.
    pub fn is_acceptable(&self, metric: Metric, value: f64) -> bool {
        match metric {
            Metric::Lufs => self.lufs_min < value && value < self.lufs_max,
            Metric::LufsRange => value < self.lufs_range_max,
            Metric::Interruptions => value > self.interruptions_min,
            Metric::Intelligibility => value > self.intelligibility_min,
        }
    }

    /// Human-readable acceptance rule, e.g. `-27 < value < -17`.
    pub fn describe(&self, metric: Metric) -> String {
        match metric {
            Metric::Lufs => format!("{} < value < {}", self.lufs_min, self.lufs_max),
            Metric::LufsRange => format!("value < {}", self.lufs_range_max),
            Metric::Interruptions => format!("value > {}", self.interruptions_min),
            Metric::Intelligibility => format!("value > {}", self.intelligibility_min),
        }
    }
}
