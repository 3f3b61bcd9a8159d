//! Report types with per-metric acceptability

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use std::path::PathBuf;

use crate::config::AcceptanceThresholds;
use crate::core::dsp::round_to;

/// The four reported metrics, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Lufs,
    LufsRange,
    Interruptions,
    Intelligibility,
}

impl Metric {
    pub fn all() -> [Self; 4] {
        [
            Self::Lufs,
            Self::LufsRange,
            Self::Interruptions,
            Self::Intelligibility,
        ]
    }

    /// Report key.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Lufs => "LUFS",
            Metric::LufsRange => "LUFS Range",
            Metric::Interruptions => "Interruptions",
            Metric::Intelligibility => "SRMR (Intelligibility)",
        }
    }

    /// Decimal places kept in the reported value.
    pub fn decimals(&self) -> u32 {
        match self {
            Metric::Interruptions => 3,
            _ => 2,
        }
    }
}

/// One rounded metric value and its verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    pub metric: Metric,
    pub value: f64,
    pub acceptable: bool,
}

impl MetricResult {
    /// Judge `raw` against `thresholds`, then round it for reporting.
    pub fn evaluate(metric: Metric, raw: f64, thresholds: &AcceptanceThresholds) -> Self {
        Self {
            metric,
            value: round_to(raw, metric.decimals()),
            acceptable: thresholds.is_acceptable(metric, raw),
        }
    }

    pub fn name(&self) -> &'static str {
        self.metric.name()
    }

    pub fn symbol(&self) -> &'static str {
        if self.acceptable {
            "✅"
        } else {
            "❌"
        }
    }
}

impl Serialize for MetricResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MetricResult", 2)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("acceptable", &self.acceptable)?;
        state.end()
    }
}

/// Ordered metric name → result mapping for one analysis run.
///
/// Serializes as a flat JSON object keyed by metric name:
/// `{"LUFS": {"value": -22.31, "acceptable": true}, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    results: Vec<MetricResult>,
}

impl AnalysisReport {
    /// Build from results; kept in [`Metric::all`] order.
    pub fn new(mut results: Vec<MetricResult>) -> Self {
        results.sort_by_key(|r| Metric::all().iter().position(|m| *m == r.metric));
        Self { results }
    }

    pub fn get(&self, metric: Metric) -> Option<&MetricResult> {
        self.results.iter().find(|r| r.metric == metric)
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.get(metric).map(|r| r.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn all_acceptable(&self) -> bool {
        self.results.iter().all(|r| r.acceptable)
    }

    pub fn failing(&self) -> impl Iterator<Item = &MetricResult> {
        self.results.iter().filter(|r| !r.acceptable)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for AnalysisReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.results.len()))?;
        for result in &self.results {
            map.serialize_entry(result.name(), result)?;
        }
        map.end()
    }
}

/// Report for a decoded file, with the stream facts shown in verbose output.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_secs: f64,
    pub codec_name: String,
    pub report: AnalysisReport,
}
