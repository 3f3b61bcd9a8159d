//! Audio analysis algorithms
//!
//! The three independent analyzers behind a quality report:
//! - Loudness (gated integrated LUFS and loudness range)
//! - Spectral interruption ratio
//! - Modulation-energy intelligibility estimate

mod intelligibility;
mod interruptions;
mod loudness;

pub use intelligibility::{BandMapping, ModulationEstimator, ModulationParams};
pub use interruptions::{InterruptionDetector, StftParams};
pub use loudness::{LoudnessMeasurement, LoudnessMeter, LoudnessParams, SILENCE_LUFS};
