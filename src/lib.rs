//! SpeechCheckr - Speech recording quality checks
//!
//! Measures four properties of a mono speech recording and judges each one
//! against a fixed acceptance policy.
//!
//! ## Metrics
//!
//! | Metric                   | Measures                                  | Acceptable            |
//! |--------------------------|-------------------------------------------|-----------------------|
//! | `LUFS`                   | Integrated loudness (BS.1770, gated)      | -27 < value < -17     |
//! | `LUFS Range`             | p95 - p10 of 3 s short-term loudness      | value < 5             |
//! | `Interruptions`          | Share of spectrogram bins above the mean  | value > 0.2           |
//! | `SRMR (Intelligibility)` | 4-20 Hz share of the modulation spectrum  | value > 3.5           |
//!
//! ## Module Structure
//!
//! - `core` - Signal model, DSP utilities, the three analyzers and the orchestrator
//! - `config` - Analysis parameters and acceptance thresholds
//! - `report` - Report types and JSON serialization
//! - `cli` - Command-line interface
//! - `error` - Error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use speechcheckr::AudioAnalyzer;
//!
//! let samples: Vec<f32> = vec![0.0; 44100 * 5];
//! let report = AudioAnalyzer::new().analyze(&samples, 44100)?;
//!
//! for result in report.iter() {
//!     println!("{}: {} {}", result.name(), result.value, result.symbol());
//! }
//! # Ok::<(), speechcheckr::AnalysisError>(())
//! ```

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Analysis parameters and thresholds
pub mod config;

// Error types
pub mod error;

// Report types
pub mod report;

pub use config::{AcceptanceThresholds, AnalysisConfig};
pub use core::{AnalyzerBuilder, AudioAnalyzer, AudioData, BandMapping, RawMetrics, Signal};
pub use error::{AnalysisError, ConfigError, DecodeError, Error};
pub use report::{AnalysisReport, FileReport, Metric, MetricResult};

/// Analyze a mono buffer with the default policy.
pub fn analyze(samples: &[f32], sample_rate: u32) -> Result<AnalysisReport, AnalysisError> {
    AudioAnalyzer::new().analyze(samples, sample_rate)
}
