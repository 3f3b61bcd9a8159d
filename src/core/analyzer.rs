// src/core/analyzer.rs
//
// High-level analysis API with builder pattern: runs the three analyzers on
// one signal and turns their raw values into a report.

use std::path::Path;

use super::analysis::{
    BandMapping, InterruptionDetector, LoudnessMeter, ModulationEstimator,
};
use super::decoder::{decode_audio, extract_mono};
use super::signal::Signal;
use crate::config::{AcceptanceThresholds, AnalysisConfig};
use crate::error::{AnalysisError, ConfigError, Error};
use crate::report::{AnalysisReport, FileReport, Metric, MetricResult};

/// Unrounded analyzer outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMetrics {
    pub integrated_lufs: f64,
    pub loudness_range: f64,
    pub interruptions: f64,
    pub intelligibility: f64,
}

/// Builder for AudioAnalyzer configuration
pub struct AnalyzerBuilder {
    config: AnalysisConfig,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn thresholds(mut self, thresholds: AcceptanceThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    pub fn stft_hop(mut self, hop_size: usize) -> Self {
        self.config.interruptions.hop_size = hop_size;
        self
    }

    pub fn band_mapping(mut self, mapping: BandMapping) -> Self {
        self.config.intelligibility.mapping = mapping;
        self
    }

    pub fn build(self) -> Result<AudioAnalyzer, ConfigError> {
        self.config.validate()?;
        Ok(AudioAnalyzer {
            config: self.config,
        })
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main audio analyzer
///
/// Holds configuration only; every call is independent and the input buffer
/// is never retained.
#[derive(Debug, Clone, Default)]
pub struct AudioAnalyzer {
    config: AnalysisConfig,
}

impl AudioAnalyzer {
    /// Analyzer with the fixed default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer with a validated custom configuration
    pub fn with_config(config: AnalysisConfig) -> Result<Self, ConfigError> {
        AnalyzerBuilder::new().config(config).build()
    }

    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a mono buffer and produce the four-metric report.
    pub fn analyze(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<AnalysisReport, AnalysisError> {
        let raw = self.measure(samples, sample_rate)?;
        Ok(self.evaluate(&raw))
    }

    /// Run the analyzers and return their unrounded values.
    ///
    /// Loudness, interruptions and intelligibility share nothing but the
    /// read-only signal, so they run concurrently.
    pub fn measure(&self, samples: &[f32], sample_rate: u32) -> Result<RawMetrics, AnalysisError> {
        let signal = Signal::new(samples, sample_rate)?;
        log::debug!(
            "analyzing {} samples at {} Hz ({:.2}s)",
            signal.len(),
            signal.sample_rate(),
            signal.duration_secs()
        );

        let (loudness, (interruptions, intelligibility)) = rayon::join(
            || LoudnessMeter::new(sample_rate, self.config.loudness.clone()).measure(&signal),
            || {
                rayon::join(
                    || InterruptionDetector::new(&self.config.interruptions).detect(&signal),
                    || {
                        ModulationEstimator::new(sample_rate, self.config.intelligibility.clone())
                            .estimate(&signal)
                    },
                )
            },
        );

        Ok(RawMetrics {
            integrated_lufs: loudness.integrated_lufs,
            loudness_range: loudness.loudness_range,
            interruptions: interruptions?,
            intelligibility: intelligibility?,
        })
    }

    /// Round and judge raw values against the configured thresholds.
    pub fn evaluate(&self, raw: &RawMetrics) -> AnalysisReport {
        let thresholds = &self.config.thresholds;
        AnalysisReport::new(vec![
            MetricResult::evaluate(Metric::Lufs, raw.integrated_lufs, thresholds),
            MetricResult::evaluate(Metric::LufsRange, raw.loudness_range, thresholds),
            MetricResult::evaluate(Metric::Interruptions, raw.interruptions, thresholds),
            MetricResult::evaluate(Metric::Intelligibility, raw.intelligibility, thresholds),
        ])
    }

    /// Decode a file, downmix it to mono and analyze it.
    pub fn analyze_file(&self, path: &Path) -> Result<FileReport, Error> {
        let audio = decode_audio(path)?;
        let mono = extract_mono(&audio);
        log::info!(
            "decoded {} ({}, {} Hz, {} ch, {:.2}s)",
            path.display(),
            audio.codec_name,
            audio.sample_rate,
            audio.channels,
            audio.duration_secs
        );
        let report = self.analyze(&mono, audio.sample_rate)?;

        Ok(FileReport {
            path: path.to_path_buf(),
            sample_rate: audio.sample_rate,
            channels: audio.channels,
            duration_secs: audio.duration_secs,
            codec_name: audio.codec_name,
            report,
        })
    }
}
