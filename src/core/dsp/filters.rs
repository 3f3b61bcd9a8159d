//! Loudness pre-filtering (K-weighting)
//!
//! Two cascaded second-order sections: a high shelf modelling the acoustic
//! effect of the head followed by a high-pass approximating the RLB curve.
//! Coefficients are designed from analog prototypes with the bilinear
//! transform so any sample rate is supported.

use std::f64::consts::PI;

/// Second-order IIR section, transposed direct form II.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl Biquad {
    /// Build from raw coefficients, normalizing by `a0`.
    pub fn from_coefficients(b: [f64; 3], a: [f64; 3]) -> Self {
        let a0 = a[0];
        Self {
            b0: b[0] / a0,
            b1: b[1] / a0,
            b2: b[2] / a0,
            a1: a[1] / a0,
            a2: a[2] / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// High shelf with `gain_db` above `fc`.
    pub fn high_shelf(gain_db: f64, q: f64, fc: f64, sample_rate: f64) -> Self {
        let a = 10f64.powf(gain_db / 40.0);
        let w0 = 2.0 * PI * (fc / sample_rate);
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();
        let sqrt_a = a.sqrt();

        let b0 = a * ((a + 1.0) + (a - 1.0) * cos_w0 + 2.0 * sqrt_a * alpha);
        let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0);
        let b2 = a * ((a + 1.0) + (a - 1.0) * cos_w0 - 2.0 * sqrt_a * alpha);
        let a0 = (a + 1.0) - (a - 1.0) * cos_w0 + 2.0 * sqrt_a * alpha;
        let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_w0);
        let a2 = (a + 1.0) - (a - 1.0) * cos_w0 - 2.0 * sqrt_a * alpha;

        Self::from_coefficients([b0, b1, b2], [a0, a1, a2])
    }

    /// Second-order high-pass at `fc`.
    pub fn high_pass(q: f64, fc: f64, sample_rate: f64) -> Self {
        let w0 = 2.0 * PI * (fc / sample_rate);
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();

        let b0 = (1.0 + cos_w0) / 2.0;
        let b1 = -(1.0 + cos_w0);
        let b2 = (1.0 + cos_w0) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha;

        Self::from_coefficients([b0, b1, b2], [a0, a1, a2])
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// K-weighting filter chain for one channel.
#[derive(Debug, Clone, Copy)]
pub struct KWeighting {
    shelf: Biquad,
    high_pass: Biquad,
}

impl KWeighting {
    pub fn new(sample_rate: u32) -> Self {
        let fs = sample_rate as f64;
        Self {
            shelf: Biquad::high_shelf(4.0, 1.0 / 2f64.sqrt(), 1500.0, fs),
            high_pass: Biquad::high_pass(0.5, 38.0, fs),
        }
    }

    /// Filter a whole buffer starting from zero state.
    pub fn apply(&self, samples: &[f32]) -> Vec<f64> {
        let mut shelf = self.shelf;
        let mut high_pass = self.high_pass;
        shelf.reset();
        high_pass.reset();

        samples
            .iter()
            .map(|&s| high_pass.process(shelf.process(s as f64)))
            .collect()
    }
}
