//! Core analysis modules

pub mod analysis;
pub mod analyzer;
pub mod decoder;
pub mod dsp;
pub mod signal;

pub use analysis::{
    BandMapping, InterruptionDetector, LoudnessMeasurement, LoudnessMeter, LoudnessParams,
    ModulationEstimator, ModulationParams, StftParams, SILENCE_LUFS,
};
pub use analyzer::{AnalyzerBuilder, AudioAnalyzer, RawMetrics};
pub use decoder::{decode_audio, extract_mono, AudioData};
pub use signal::Signal;
