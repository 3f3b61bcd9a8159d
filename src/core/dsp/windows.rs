//! Window function implementations

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types
///
/// All windows are periodic (DFT-even): the denominator is the window length,
/// not length - 1, which is what spectrogram framing expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    Rectangular,
    #[default]
    Hann,
    Hamming,
}

/// Create window function
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f64> {
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = i as f64;
            match window_type {
                WindowType::Rectangular => 1.0,
                WindowType::Hann => 0.5 - 0.5 * (2.0 * PI * x / n).cos(),
                WindowType::Hamming => 0.54 - 0.46 * (2.0 * PI * x / n).cos(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let window = create_window(4, WindowType::Hann);
        assert!((window[0]).abs() < 1e-12); // zero at the left edge
        assert!((window[2] - 1.0).abs() < 1e-12); // peak at N/2
        assert!((window[1] - 0.5).abs() < 1e-12);
        assert!((window[3] - 0.5).abs() < 1e-12); // periodic, not symmetric
    }

    #[test]
    fn test_rectangular_window() {
        let window = create_window(8, WindowType::Rectangular);
        assert!(window.iter().all(|&w| w == 1.0));
    }
}
