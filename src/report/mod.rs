//! Report module for SpeechCheckr

mod result;

pub use result::{AnalysisReport, FileReport, Metric, MetricResult};
