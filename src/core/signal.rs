// src/core/signal.rs
//
// Validated view over a decoded mono buffer.

use crate::error::AnalysisError;

/// Mono samples normalized to [-1.0, 1.0] paired with their sample rate.
///
/// Construction checks the input boundary once so the analyzers can assume a
/// non-empty, finite buffer and a positive rate. The buffer is borrowed and
/// never modified.
#[derive(Debug, Clone, Copy)]
pub struct Signal<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

impl<'a> Signal<'a> {
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Result<Self, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::invalid_input("signal buffer is empty"));
        }
        if sample_rate == 0 {
            return Err(AnalysisError::invalid_input("sample rate must be positive"));
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::invalid_input(format!(
                "non-finite sample at index {}",
                index
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed signal.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
