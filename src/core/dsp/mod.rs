//! Digital Signal Processing utilities
//!
//! Numerical primitives the analyzers are built on: real and complex FFTs,
//! the centered STFT, the Hilbert envelope, K-weighting filters and
//! percentile statistics.

pub mod fft;
pub mod filters;
pub mod stats;
pub mod windows;

pub use fft::{
    HilbertBuffers, HilbertEnvelope, RealSpectrum, RealSpectrumBuffers, StftProcessor,
    FRAMES_PER_BLOCK,
};
pub use filters::{Biquad, KWeighting};
pub use stats::{amplitude_to_db, mean, percentile, round_to};
pub use windows::{create_window, WindowType};
