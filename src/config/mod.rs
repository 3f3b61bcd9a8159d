//! Configuration module for SpeechCheckr

mod settings;
mod thresholds;

pub use settings::AnalysisConfig;
pub use thresholds::AcceptanceThresholds;
