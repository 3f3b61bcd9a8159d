// src/core/analysis/interruptions.rs
//
// Spectral interruption ratio: the share of time-frequency bins whose level
// exceeds the spectrogram's mean level.
//
// This is a heuristic for spectral non-stationarity. It is not calibrated
// against any physical notion of dropouts or gaps: a steady tone and a
// recording full of gaps can both score low.

use serde::{Deserialize, Serialize};

use crate::core::dsp::{amplitude_to_db, StftProcessor, WindowType};
use crate::core::signal::Signal;
use crate::error::AnalysisError;

/// STFT parameters for the interruption ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StftParams {
    pub fft_size: usize,
    pub hop_size: usize,
    pub window: WindowType,
    /// Smallest magnitude considered when converting to dB
    pub amin: f64,
    /// Dynamic range kept below the loudest bin, in dB
    pub top_db: f64,
}

impl Default for StftParams {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            hop_size: 256,
            window: WindowType::Hann,
            amin: 1e-5,
            top_db: 80.0,
        }
    }
}

/// Interruption ratio detector
pub struct InterruptionDetector {
    stft: StftProcessor,
    amin: f64,
    top_db: f64,
}

impl InterruptionDetector {
    pub fn new(params: &StftParams) -> Self {
        Self {
            stft: StftProcessor::new(params.fft_size, params.hop_size, params.window),
            amin: params.amin,
            top_db: params.top_db,
        }
    }

    /// Fraction in [0, 1] of spectrogram bins strictly above the mean dB level.
    ///
    /// The spectrogram is streamed block by block and never held whole.
    pub fn detect(&self, signal: &Signal<'_>) -> Result<f64, AnalysisError> {
        let samples = signal.samples();
        let num_frames = self.stft.num_frames(samples.len());
        let total_bins = num_frames * self.stft.num_bins();

        log::debug!(
            "interruption ratio over {} frames x {} bins",
            num_frames,
            self.stft.num_bins()
        );

        fraction_above_mean(total_bins, self.amin, self.top_db, |reduce| {
            self.stft.map_frame_blocks(samples, reduce)
        })
    }
}

/// Reduces one block of magnitudes to a single value.
type BlockReducer<'a> = &'a (dyn Fn(&[f32]) -> f64 + Sync + 'a);

/// Share of `total_bins` magnitudes whose dB level (relative to the loudest
/// bin, floored `top_db` below it) is strictly above the mean dB level.
///
/// `blocks` applies a reducer to every block of magnitudes and returns the
/// per-block results in order. It is invoked once for the peak, once for the
/// dB sum and once for the count.
fn fraction_above_mean<E>(
    total_bins: usize,
    amin: f64,
    top_db: f64,
    mut blocks: impl FnMut(BlockReducer<'_>) -> Result<Vec<f64>, E>,
) -> Result<f64, E> {
    if total_bins == 0 {
        return Ok(0.0);
    }

    let peak = |block: &[f32]| block.iter().fold(0.0f32, |acc, &m| acc.max(m)) as f64;
    let reference = blocks(&peak)?.into_iter().fold(0.0f64, f64::max);

    let floor = amplitude_to_db(reference, reference, amin) - top_db;
    let to_db = |m: f32| amplitude_to_db(m as f64, reference, amin).max(floor);

    let db_sum = |block: &[f32]| block.iter().map(|&m| to_db(m)).sum::<f64>();
    let mean_db = blocks(&db_sum)?.iter().sum::<f64>() / total_bins as f64;

    let above = |block: &[f32]| block.iter().filter(|&&m| to_db(m) > mean_db).count() as f64;
    let count: f64 = blocks(&above)?.iter().sum();

    Ok(count / total_bins as f64)
}
