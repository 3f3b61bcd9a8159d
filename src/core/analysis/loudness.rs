// src/core/analysis/loudness.rs
//
// Gated integrated loudness (K-weighted, absolute + relative gate) and a
// percentile-based loudness range over sliding 3 s windows.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::dsp::{percentile, KWeighting};
use crate::core::signal::Signal;

/// Reported integrated loudness when every block gates out (silence).
pub const SILENCE_LUFS: f64 = -120.0;

/// Offset between mean-square energy in dB and LUFS.
const LUFS_OFFSET: f64 = -0.691;

/// Loudness meter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoudnessParams {
    /// Gating block length in seconds
    pub block_secs: f64,
    /// Fractional overlap between consecutive gating blocks
    pub block_overlap: f64,
    /// Blocks quieter than this never count
    pub absolute_gate_lufs: f64,
    /// Relative gate, in LU below the absolute-gated loudness
    pub relative_gate_lu: f64,
    /// Loudness-range analysis window in seconds
    pub range_window_secs: f64,
    /// Hop between loudness-range windows in seconds
    pub range_hop_secs: f64,
    pub range_low_percentile: f64,
    pub range_high_percentile: f64,
}

impl Default for LoudnessParams {
    fn default() -> Self {
        Self {
            block_secs: 0.4,
            block_overlap: 0.75,
            absolute_gate_lufs: -70.0,
            relative_gate_lu: -10.0,
            range_window_secs: 3.0,
            range_hop_secs: 1.0,
            range_low_percentile: 10.0,
            range_high_percentile: 95.0,
        }
    }
}

/// Loudness measurement result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessMeasurement {
    pub integrated_lufs: f64,
    pub loudness_range: f64,
}

/// Loudness meter for one sample rate.
pub struct LoudnessMeter {
    sample_rate: u32,
    params: LoudnessParams,
    filter: KWeighting,
}

impl LoudnessMeter {
    pub fn new(sample_rate: u32, params: LoudnessParams) -> Self {
        Self {
            sample_rate,
            params,
            filter: KWeighting::new(sample_rate),
        }
    }

    /// Integrated loudness and loudness range of the whole signal.
    pub fn measure(&self, signal: &Signal<'_>) -> LoudnessMeasurement {
        let samples = signal.samples();
        let integrated_lufs = self.integrated_loudness(samples).unwrap_or_else(|| {
            log::debug!("all loudness blocks gated out, reporting {} LUFS", SILENCE_LUFS);
            SILENCE_LUFS
        });

        LoudnessMeasurement {
            integrated_lufs,
            loudness_range: self.loudness_range(samples),
        }
    }

    /// Gated integrated loudness in LUFS.
    ///
    /// `None` when no block survives gating, which is what silence produces.
    pub fn integrated_loudness(&self, samples: &[f32]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }

        let weighted = self.filter.apply(samples);
        let energies = self.block_energies(&weighted);
        let loudness: Vec<f64> = energies.iter().map(|&z| energy_to_lufs(z)).collect();

        let absolute_gate = self.params.absolute_gate_lufs;
        let above_absolute: Vec<f64> = energies
            .iter()
            .zip(&loudness)
            .filter(|(_, &l)| l >= absolute_gate)
            .map(|(&z, _)| z)
            .collect();
        if above_absolute.is_empty() {
            return None;
        }

        let relative_gate =
            energy_to_lufs(mean_energy(&above_absolute)) + self.params.relative_gate_lu;
        let gated: Vec<f64> = energies
            .iter()
            .zip(&loudness)
            .filter(|(_, &l)| l > relative_gate && l > absolute_gate)
            .map(|(&z, _)| z)
            .collect();
        if gated.is_empty() {
            return None;
        }

        let lufs = energy_to_lufs(mean_energy(&gated));
        lufs.is_finite().then_some(lufs)
    }

    /// Spread between the high and low percentile of per-window loudness.
    ///
    /// Each window is measured independently (its own filter state and
    /// gating). Windows that gate out entirely are skipped. A signal too short
    /// to hold a single window, or with no measurable window, has range 0.
    pub fn loudness_range(&self, samples: &[f32]) -> f64 {
        let rate = self.sample_rate as f64;
        let window = (self.params.range_window_secs * rate).round() as usize;
        let hop = ((self.params.range_hop_secs * rate).round() as usize).max(1);

        let starts: Vec<usize> = (0..samples.len().saturating_sub(window))
            .step_by(hop)
            .collect();
        if starts.is_empty() {
            log::debug!(
                "signal of {} samples is shorter than one {} sample loudness-range window",
                samples.len(),
                window
            );
            return 0.0;
        }

        let window_loudness: Vec<Option<f64>> = starts
            .par_iter()
            .map(|&start| self.integrated_loudness(&samples[start..start + window]))
            .collect();
        let values: Vec<f64> = window_loudness
            .into_iter()
            .flatten()
            .filter(|l| l.is_finite())
            .collect();

        log::debug!(
            "loudness range over {} windows ({} measurable)",
            starts.len(),
            values.len()
        );

        match (
            percentile(&values, self.params.range_high_percentile),
            percentile(&values, self.params.range_low_percentile),
        ) {
            (Some(high), Some(low)) => high - low,
            _ => 0.0,
        }
    }

    /// Mean-square energy of each overlapping gating block.
    fn block_energies(&self, weighted: &[f64]) -> Vec<f64> {
        let rate = self.sample_rate as f64;
        let block_secs = self.params.block_secs;
        let step = 1.0 - self.params.block_overlap;
        let duration = weighted.len() as f64 / rate;

        if duration < block_secs {
            // Shorter than one block: measure the buffer as a single block.
            let sum: f64 = weighted.iter().map(|x| x * x).sum();
            return vec![sum / weighted.len() as f64];
        }

        let num_blocks =
            ((duration - block_secs) / (block_secs * step)).round_ties_even() as usize + 1;
        let norm = block_secs * rate;

        (0..num_blocks)
            .map(|j| {
                let lower = (block_secs * (j as f64 * step) * rate) as usize;
                let upper = (block_secs * (j as f64 * step + 1.0) * rate) as usize;
                let lower = lower.min(weighted.len());
                let upper = upper.min(weighted.len());
                let sum: f64 = weighted[lower..upper].iter().map(|x| x * x).sum();
                sum / norm
            })
            .collect()
    }
}

fn energy_to_lufs(energy: f64) -> f64 {
    if energy > 0.0 {
        LUFS_OFFSET + 10.0 * energy.log10()
    } else {
        f64::NEG_INFINITY
    }
}

fn mean_energy(energies: &[f64]) -> f64 {
    energies.iter().sum::<f64>() / energies.len() as f64
}
