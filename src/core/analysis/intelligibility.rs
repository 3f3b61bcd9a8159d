// src/core/analysis/intelligibility.rs
//
// Modulation-energy intelligibility estimate (an SRMR-like proxy).
//
// Each frame's amplitude envelope is taken from the analytic signal, its
// magnitude spectrum is the modulation spectrum, and the frame score is the
// share of that spectrum falling in the speech modulation band (4-20 Hz).
// The run score is the mean over frames.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::dsp::{mean, HilbertBuffers, HilbertEnvelope, RealSpectrum, RealSpectrumBuffers};
use crate::core::signal::Signal;
use crate::error::AnalysisError;

/// How the modulation band is mapped onto envelope-spectrum bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BandMapping {
    /// `bin = freq * frame_length / sample_rate`, so the band tracks the
    /// actual sample rate.
    Derived,
    /// Literal inclusive bin range regardless of sample rate.
    FixedBins { first: usize, last: usize },
}

impl Default for BandMapping {
    fn default() -> Self {
        Self::Derived
    }
}

/// Modulation estimator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulationParams {
    pub frame_length: usize,
    pub hop_length: usize,
    pub band_low_hz: f64,
    /// Exclusive upper band edge
    pub band_high_hz: f64,
    pub mapping: BandMapping,
    /// Added to the denominator of each frame ratio
    pub epsilon: f64,
}

impl Default for ModulationParams {
    fn default() -> Self {
        Self {
            frame_length: 1024,
            hop_length: 512,
            band_low_hz: 4.0,
            band_high_hz: 20.0,
            mapping: BandMapping::Derived,
            epsilon: 1e-6,
        }
    }
}

/// Per-worker state for one frame computation.
struct FrameBuffers {
    hilbert: HilbertBuffers,
    spectrum: RealSpectrumBuffers,
    envelope: Vec<f64>,
    magnitudes: Vec<f64>,
}

/// Modulation intelligibility estimator
pub struct ModulationEstimator {
    sample_rate: u32,
    params: ModulationParams,
    hilbert: HilbertEnvelope,
    spectrum: RealSpectrum,
    band: Option<(usize, usize)>,
}

impl ModulationEstimator {
    pub fn new(sample_rate: u32, params: ModulationParams) -> Self {
        let hilbert = HilbertEnvelope::new(params.frame_length);
        let spectrum = RealSpectrum::new(params.frame_length);
        let band = resolve_band(&params, sample_rate, spectrum.num_bins());
        Self {
            sample_rate,
            params,
            hilbert,
            spectrum,
            band,
        }
    }

    /// Inclusive envelope-spectrum bin range summed as band energy, or `None`
    /// when the band does not cover any bin at this rate and frame length.
    pub fn band_bins(&self) -> Option<(usize, usize)> {
        self.band
    }

    /// Number of complete frames; a trailing partial frame is discarded.
    pub fn num_frames(&self, num_samples: usize) -> usize {
        let frame_length = self.params.frame_length;
        if num_samples < frame_length || self.params.hop_length == 0 {
            return 0;
        }
        1 + (num_samples - frame_length) / self.params.hop_length
    }

    /// Mean per-frame modulation energy ratio. Never negative; 0.0 when the
    /// signal holds no complete frame.
    pub fn estimate(&self, signal: &Signal<'_>) -> Result<f64, AnalysisError> {
        let samples = signal.samples();
        let num_frames = self.num_frames(samples.len());
        if num_frames == 0 {
            log::debug!(
                "signal of {} samples holds no {} sample modulation frame",
                samples.len(),
                self.params.frame_length
            );
            return Ok(0.0);
        }

        let Some((first, last)) = self.band else {
            log::warn!(
                "modulation band {}-{} Hz covers no bin at {} Hz with {} sample frames",
                self.params.band_low_hz,
                self.params.band_high_hz,
                self.sample_rate,
                self.params.frame_length
            );
            return Ok(0.0);
        };
        log::debug!(
            "modulation band bins {}..={} over {} frames",
            first,
            last,
            num_frames
        );

        let frame_length = self.params.frame_length;
        let hop = self.params.hop_length;
        let epsilon = self.params.epsilon;

        // Frame ratios are collected in frame order and reduced sequentially
        // so the mean is reproducible across thread counts.
        let ratios: Vec<f64> = (0..num_frames)
            .into_par_iter()
            .map_init(
                || self.make_buffers(),
                |buffers, index| -> Result<f64, AnalysisError> {
                    let start = index * hop;
                    let frame = &samples[start..start + frame_length];
                    self.hilbert
                        .compute(frame, &mut buffers.hilbert, &mut buffers.envelope)?;
                    self.spectrum.magnitudes_into(
                        &buffers.envelope,
                        &mut buffers.spectrum,
                        &mut buffers.magnitudes,
                    )?;

                    let band: f64 = buffers.magnitudes[first..=last].iter().sum();
                    let total: f64 = buffers.magnitudes.iter().sum();
                    Ok(band / (total + epsilon))
                },
            )
            .collect::<Result<_, _>>()?;

        Ok(mean(&ratios).unwrap_or(0.0))
    }

    fn make_buffers(&self) -> FrameBuffers {
        FrameBuffers {
            hilbert: self.hilbert.make_buffers(),
            spectrum: self.spectrum.make_buffers(),
            envelope: vec![0.0; self.params.frame_length],
            magnitudes: vec![0.0; self.spectrum.num_bins()],
        }
    }
}

/// Inclusive bin range for the band `[band_low_hz, band_high_hz)`.
fn resolve_band(
    params: &ModulationParams,
    sample_rate: u32,
    num_bins: usize,
) -> Option<(usize, usize)> {
    if num_bins == 0 {
        return None;
    }
    let (first, last) = match params.mapping {
        BandMapping::Derived => {
            let bins_per_hz = params.frame_length as f64 / sample_rate as f64;
            let first = (params.band_low_hz * bins_per_hz).ceil().max(0.0) as usize;
            // upper edge is exclusive: the bin sitting exactly on it is left out
            let end = (params.band_high_hz * bins_per_hz).ceil().max(0.0) as usize;
            (first, end.checked_sub(1)?)
        }
        BandMapping::FixedBins { first, last } => (first, last),
    };
    let last = last.min(num_bins - 1);
    (first <= last).then_some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn am_tone(
        carrier: f64,
        modulation: f64,
        depth: f64,
        len: usize,
        sample_rate: u32,
    ) -> Vec<f32> {
        let fs = sample_rate as f64;
        (0..len)
            .map(|i| {
                let t = i as f64 / fs;
                let envelope = 0.5 * (1.0 + depth * (2.0 * PI * modulation * t).sin());
                (envelope * (2.0 * PI * carrier * t).sin()) as f32
            })
            .collect()
    }

    #[test]
    fn test_derived_band_tracks_sample_rate() {
        let params = ModulationParams::default();
        let at_1024 = ModulationEstimator::new(1024, params.clone());
        assert_eq!(at_1024.band_bins(), Some((4, 19)));

        let at_2048 = ModulationEstimator::new(2048, params.clone());
        assert_eq!(at_2048.band_bins(), Some((2, 9)));

        // 10.5 Hz upper edge falls between bins 10 and 11
        let params_mid = ModulationParams {
            band_high_hz: 10.5,
            ..Default::default()
        };
        assert_eq!(ModulationEstimator::new(1024, params_mid).band_bins(), Some((4, 10)));

        // 43 Hz bins: the whole 4-20 Hz band falls between bins
        let at_44k = ModulationEstimator::new(44100, params);
        assert_eq!(at_44k.band_bins(), None);
    }

    #[test]
    fn test_fixed_bins() {
        let params = ModulationParams {
            mapping: BandMapping::FixedBins { first: 4, last: 19 },
            ..Default::default()
        };
        let estimator = ModulationEstimator::new(44100, params);
        assert_eq!(estimator.band_bins(), Some((4, 19)));

        let params = ModulationParams {
            mapping: BandMapping::FixedBins { first: 600, last: 700 },
            ..Default::default()
        };
        assert_eq!(ModulationEstimator::new(44100, params).band_bins(), None);
    }

    #[test]
    fn test_frame_count() {
        let estimator = ModulationEstimator::new(16000, ModulationParams::default());
        assert_eq!(estimator.num_frames(1023), 0);
        assert_eq!(estimator.num_frames(1024), 1);
        assert_eq!(estimator.num_frames(1535), 1);
        assert_eq!(estimator.num_frames(1536), 2);
    }

    #[test]
    fn test_short_input_is_zero() {
        let samples = vec![0.3f32; 500];
        let signal = Signal::new(&samples, 1024).unwrap();
        let estimator = ModulationEstimator::new(1024, ModulationParams::default());
        assert_eq!(estimator.estimate(&signal).unwrap(), 0.0);
    }

    #[test]
    fn test_silence_is_zero() {
        let samples = vec![0.0f32; 8192];
        let signal = Signal::new(&samples, 1024).unwrap();
        let estimator = ModulationEstimator::new(1024, ModulationParams::default());
        assert_eq!(estimator.estimate(&signal).unwrap(), 0.0);
    }

    #[test]
    fn test_modulated_beats_steady() {
        let estimator = ModulationEstimator::new(1024, ModulationParams::default());

        // Envelope 0.5 * (1 + sin(2*pi*10*t)): DC is N/2, the 10 Hz line N/4,
        // so the band holds a third of the total magnitude.
        let modulated = am_tone(200.0, 10.0, 1.0, 8192, 1024);
        let signal = Signal::new(&modulated, 1024).unwrap();
        let score = estimator.estimate(&signal).unwrap();
        assert!((score - 1.0 / 3.0).abs() < 0.02, "got {}", score);

        let steady = am_tone(200.0, 10.0, 0.0, 8192, 1024);
        let signal = Signal::new(&steady, 1024).unwrap();
        let score = estimator.estimate(&signal).unwrap();
        assert!(score < 0.01, "got {}", score);
    }

    #[test]
    fn test_unmapped_band_is_zero() {
        let samples = am_tone(1000.0, 10.0, 1.0, 44100, 44100);
        let signal = Signal::new(&samples, 44100).unwrap();
        let estimator = ModulationEstimator::new(44100, ModulationParams::default());
        assert_eq!(estimator.estimate(&signal).unwrap(), 0.0);
    }

    #[test]
    fn test_derived_matches_fixed_bins_at_unit_resolution() {
        let derived = ModulationEstimator::new(1024, ModulationParams::default());
        let fixed = ModulationEstimator::new(
            1024,
            ModulationParams {
                mapping: BandMapping::FixedBins { first: 4, last: 19 },
                ..Default::default()
            },
        );
        assert_eq!(derived.band_bins(), fixed.band_bins());

        // 20 Hz sits on the exclusive upper edge, 19 Hz inside the band
        for (modulation, inside) in [(20.0, false), (19.0, true), (4.0, true)] {
            let samples = am_tone(200.0, modulation, 1.0, 8192, 1024);
            let signal = Signal::new(&samples, 1024).unwrap();
            let a = derived.estimate(&signal).unwrap();
            let b = fixed.estimate(&signal).unwrap();
            assert_eq!(a, b, "{} Hz", modulation);
            if inside {
                assert!((a - 1.0 / 3.0).abs() < 0.02, "{} Hz: got {}", modulation, a);
            } else {
                assert!(a < 0.01, "{} Hz: got {}", modulation, a);
            }
        }
    }
}
