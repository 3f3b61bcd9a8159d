// src/config/settings.rs
//
// Analyzer parameters and acceptance policy, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::thresholds::AcceptanceThresholds;
use crate::core::analysis::{BandMapping, LoudnessParams, ModulationParams, StftParams};
use crate::error::ConfigError;

/// Complete analysis configuration
///
/// `Default` is the fixed contract: every field not present in a loaded file
/// keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub loudness: LoudnessParams,
    pub interruptions: StftParams,
    pub intelligibility: ModulationParams,
    pub thresholds: AcceptanceThresholds,
}

impl AnalysisConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let loudness = &self.loudness;
        if !(loudness.block_secs > 0.0) {
            return Err(ConfigError::invalid_param("loudness.block_secs", "must be positive"));
        }
        if !(0.0..1.0).contains(&loudness.block_overlap) {
            return Err(ConfigError::invalid_param(
                "loudness.block_overlap",
                "must be in [0, 1)",
            ));
        }
        if !(loudness.range_window_secs > 0.0) {
            return Err(ConfigError::invalid_param(
                "loudness.range_window_secs",
                "must be positive",
            ));
        }
        if !(loudness.range_hop_secs > 0.0) {
            return Err(ConfigError::invalid_param("loudness.range_hop_secs", "must be positive"));
        }
        for (name, p) in [
            ("loudness.range_low_percentile", loudness.range_low_percentile),
            ("loudness.range_high_percentile", loudness.range_high_percentile),
        ] {
            if !(0.0..=100.0).contains(&p) {
                return Err(ConfigError::invalid_param(name, "must be in [0, 100]"));
            }
        }
        if loudness.range_low_percentile >= loudness.range_high_percentile {
            return Err(ConfigError::invalid_param(
                "loudness.range_low_percentile",
                "must be below range_high_percentile",
            ));
        }

        let stft = &self.interruptions;
        if stft.fft_size < 2 {
            return Err(ConfigError::invalid_param("interruptions.fft_size", "must be at least 2"));
        }
        if stft.hop_size == 0 {
            return Err(ConfigError::invalid_param("interruptions.hop_size", "must be positive"));
        }
        if !(stft.amin > 0.0) {
            return Err(ConfigError::invalid_param("interruptions.amin", "must be positive"));
        }
        if !(stft.top_db >= 0.0) {
            return Err(ConfigError::invalid_param("interruptions.top_db", "must not be negative"));
        }

        let modulation = &self.intelligibility;
        if modulation.frame_length < 2 {
            return Err(ConfigError::invalid_param(
                "intelligibility.frame_length",
                "must be at least 2",
            ));
        }
        if modulation.hop_length == 0 {
            return Err(ConfigError::invalid_param(
                "intelligibility.hop_length",
                "must be positive",
            ));
        }
        if !(modulation.band_low_hz >= 0.0 && modulation.band_low_hz < modulation.band_high_hz) {
            return Err(ConfigError::invalid_param(
                "intelligibility.band_low_hz",
                "must be non-negative and below band_high_hz",
            ));
        }
        if let BandMapping::FixedBins { first, last } = modulation.mapping {
            if first > last {
                return Err(ConfigError::invalid_param(
                    "intelligibility.mapping",
                    "first bin must not exceed last bin",
                ));
            }
        }
        if !(modulation.epsilon >= 0.0) {
            return Err(ConfigError::invalid_param(
                "intelligibility.epsilon",
                "must not be negative",
            ));
        }

        let thresholds = &self.thresholds;
        if !(thresholds.lufs_min < thresholds.lufs_max) {
            return Err(ConfigError::invalid_param(
                "thresholds.lufs_min",
                "must be below lufs_max",
            ));
        }

        Ok(())
    }
}
