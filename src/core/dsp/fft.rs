//! FFT primitives: real spectra, centered STFT magnitudes and the Hilbert envelope

use std::sync::Arc;

use num_complex::Complex;
use rayon::prelude::*;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};

use super::windows::{create_window, WindowType};
use crate::error::AnalysisError;

/// Forward real-input FFT of a fixed length.
///
/// The plan is shared; every worker owns a [`RealSpectrumBuffers`] so the
/// transform can run from many threads at once.
pub struct RealSpectrum {
    fft: Arc<dyn RealToComplex<f64>>,
    len: usize,
}

/// Per-worker buffers for [`RealSpectrum`].
pub struct RealSpectrumBuffers {
    input: Vec<f64>,
    output: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl RealSpectrumBuffers {
    /// Time-domain input, exactly the transform length.
    pub fn input_mut(&mut self) -> &mut [f64] {
        &mut self.input
    }
}

impl RealSpectrum {
    pub fn new(len: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        Self {
            fft: planner.plan_fft_forward(len),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-negative frequency bins: `len / 2 + 1`.
    pub fn num_bins(&self) -> usize {
        self.len / 2 + 1
    }

    pub fn make_buffers(&self) -> RealSpectrumBuffers {
        RealSpectrumBuffers {
            input: self.fft.make_input_vec(),
            output: self.fft.make_output_vec(),
            scratch: self.fft.make_scratch_vec(),
        }
    }

    /// Transform `buffers.input` (clobbered) and return the complex bins.
    pub fn transform<'b>(
        &self,
        buffers: &'b mut RealSpectrumBuffers,
    ) -> Result<&'b [Complex<f64>], AnalysisError> {
        self.fft.process_with_scratch(
            &mut buffers.input,
            &mut buffers.output,
            &mut buffers.scratch,
        )?;
        Ok(&buffers.output)
    }

    /// Magnitude spectrum of `samples`, written into `out`.
    pub fn magnitudes_into(
        &self,
        samples: &[f64],
        buffers: &mut RealSpectrumBuffers,
        out: &mut [f64],
    ) -> Result<(), AnalysisError> {
        if samples.len() != self.len || out.len() != self.num_bins() {
            return Err(AnalysisError::failure(format!(
                "real FFT of length {} got {} samples into {} bins",
                self.len,
                samples.len(),
                out.len()
            )));
        }
        buffers.input.copy_from_slice(samples);
        let bins = self.transform(buffers)?;
        for (m, c) in out.iter_mut().zip(bins) {
            *m = c.norm();
        }
        Ok(())
    }
}

/// Frames handed to one [`StftProcessor::map_frame_blocks`] callback.
pub const FRAMES_PER_BLOCK: usize = 256;

/// Short-time Fourier transform with centered frames.
///
/// The signal is zero-padded by `fft_size / 2` on both sides so frame `t` is
/// centered on sample `t * hop_size`.
pub struct StftProcessor {
    spectrum: RealSpectrum,
    window: Vec<f64>,
    hop_size: usize,
}

impl StftProcessor {
    pub fn new(fft_size: usize, hop_size: usize, window_type: WindowType) -> Self {
        Self {
            spectrum: RealSpectrum::new(fft_size),
            window: create_window(fft_size, window_type),
            hop_size,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.spectrum.len()
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn num_bins(&self) -> usize {
        self.spectrum.num_bins()
    }

    pub fn num_frames(&self, num_samples: usize) -> usize {
        let fft_size = self.fft_size();
        let padded = num_samples + 2 * (fft_size / 2);
        if num_samples == 0 || padded < fft_size || self.hop_size == 0 {
            return 0;
        }
        (padded - fft_size) / self.hop_size + 1
    }

    /// Run `op` over the magnitude spectrogram one block of frames at a
    /// time and return its results in block order.
    ///
    /// Each block holds up to [`FRAMES_PER_BLOCK`] frames stored frame-major
    /// (`num_bins` values per frame). Blocks are transformed in parallel, so
    /// peak memory is bounded by one block per worker rather than the whole
    /// spectrogram; ordering of the returned values does not depend on
    /// scheduling.
    pub fn map_frame_blocks<T, F>(&self, samples: &[f32], op: F) -> Result<Vec<T>, AnalysisError>
    where
        T: Send,
        F: Fn(&[f32]) -> T + Sync + Send,
    {
        let num_bins = self.num_bins();
        let num_frames = self.num_frames(samples.len());
        let num_blocks = num_frames.div_ceil(FRAMES_PER_BLOCK);

        (0..num_blocks)
            .into_par_iter()
            .map_init(
                || (self.spectrum.make_buffers(), Vec::new()),
                |(buffers, block), index| -> Result<T, AnalysisError> {
                    let first = index * FRAMES_PER_BLOCK;
                    let count = FRAMES_PER_BLOCK.min(num_frames - first);
                    block.resize(count * num_bins, 0.0f32);
                    for (offset, row) in block.chunks_exact_mut(num_bins).enumerate() {
                        self.frame_magnitudes(samples, first + offset, buffers, row)?;
                    }
                    Ok(op(&block[..]))
                },
            )
            .collect()
    }

    fn frame_magnitudes(
        &self,
        samples: &[f32],
        frame: usize,
        buffers: &mut RealSpectrumBuffers,
        row: &mut [f32],
    ) -> Result<(), AnalysisError> {
        let pad = self.fft_size() / 2;
        let start = frame * self.hop_size;
        for (j, slot) in buffers.input_mut().iter_mut().enumerate() {
            let sample = (start + j)
                .checked_sub(pad)
                .and_then(|i| samples.get(i))
                .map_or(0.0, |&s| s as f64);
            *slot = sample * self.window[j];
        }
        let bins = self.spectrum.transform(buffers)?;
        for (m, c) in row.iter_mut().zip(bins) {
            *m = c.norm() as f32;
        }
        Ok(())
    }
}

/// Analytic-signal envelope (magnitude of the Hilbert transform) of
/// fixed-length real frames.
pub struct HilbertEnvelope {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    /// Spectral weights with the 1/N inverse normalization folded in.
    gains: Vec<f64>,
}

/// Per-worker buffers for [`HilbertEnvelope`].
pub struct HilbertBuffers {
    buffer: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl HilbertEnvelope {
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);

        // Keep DC (and Nyquist for even lengths), double positive
        // frequencies, drop negative ones.
        let mut gains = vec![0.0; len];
        if len > 0 {
            gains[0] = 1.0;
            if len % 2 == 0 {
                gains[len / 2] = 1.0;
                for g in &mut gains[1..len / 2] {
                    *g = 2.0;
                }
            } else {
                for g in &mut gains[1..(len + 1) / 2] {
                    *g = 2.0;
                }
            }
        }
        let norm = 1.0 / len.max(1) as f64;
        for g in &mut gains {
            *g *= norm;
        }

        Self {
            forward,
            inverse,
            gains,
        }
    }

    pub fn len(&self) -> usize {
        self.gains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gains.is_empty()
    }

    pub fn make_buffers(&self) -> HilbertBuffers {
        let scratch_len = self
            .forward
            .get_inplace_scratch_len()
            .max(self.inverse.get_inplace_scratch_len());
        HilbertBuffers {
            buffer: vec![Complex::new(0.0, 0.0); self.len()],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        }
    }

    /// Write `|analytic(frame)|` into `envelope`.
    pub fn compute(
        &self,
        frame: &[f32],
        buffers: &mut HilbertBuffers,
        envelope: &mut [f64],
    ) -> Result<(), AnalysisError> {
        if frame.len() != self.len() || envelope.len() != self.len() {
            return Err(AnalysisError::failure(format!(
                "Hilbert transform of length {} got frame {} and output {}",
                self.len(),
                frame.len(),
                envelope.len()
            )));
        }

        for (c, &s) in buffers.buffer.iter_mut().zip(frame) {
            *c = Complex::new(s as f64, 0.0);
        }
        self.forward
            .process_with_scratch(&mut buffers.buffer, &mut buffers.scratch);
        for (c, &g) in buffers.buffer.iter_mut().zip(&self.gains) {
            *c *= g;
        }
        self.inverse
            .process_with_scratch(&mut buffers.buffer, &mut buffers.scratch);

        for (e, c) in envelope.iter_mut().zip(&buffers.buffer) {
            *e = c.norm();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_real_spectrum_peak() {
        let spectrum = RealSpectrum::new(64);
        let mut buffers = spectrum.make_buffers();
        let samples: Vec<f64> = (0..64).map(|i| (2.0 * PI * 8.0 * i as f64 / 64.0).cos()).collect();
        let mut mags = vec![0.0; spectrum.num_bins()];
        spectrum.magnitudes_into(&samples, &mut buffers, &mut mags).unwrap();

        assert_eq!(mags.len(), 33);
        assert!((mags[8] - 32.0).abs() < 1e-9);
        assert!(mags[3].abs() < 1e-9);
    }

    #[test]
    fn test_real_spectrum_size_mismatch() {
        let spectrum = RealSpectrum::new(16);
        let mut buffers = spectrum.make_buffers();
        let mut mags = vec![0.0; spectrum.num_bins()];
        let err = spectrum
            .magnitudes_into(&[0.0; 8], &mut buffers, &mut mags)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::AnalysisFailure { .. }));
    }

    #[test]
    fn test_stft_frame_count() {
        let stft = StftProcessor::new(1024, 256, WindowType::Hann);
        assert_eq!(stft.num_bins(), 513);
        assert_eq!(stft.num_frames(1), 1);
        assert_eq!(stft.num_frames(255), 1);
        assert_eq!(stft.num_frames(256), 2);
        assert_eq!(stft.num_frames(44100), 1 + 44100 / 256);
    }

    #[test]
    fn test_stft_centered_tone() {
        let sample_rate = 8000.0;
        let samples: Vec<f32> = (0..4096)
            .map(|i| (2.0 * PI * 1000.0 * i as f64 / sample_rate).sin() as f32)
            .collect();
        let stft = StftProcessor::new(1024, 256, WindowType::Hann);
        let blocks = stft.map_frame_blocks(&samples, |block| block.to_vec()).unwrap();

        assert_eq!(blocks.len(), 1);
        let spec = &blocks[0];
        assert_eq!(spec.len(), 17 * 513);

        // 1 kHz at 8 kHz / 1024 points is bin 128
        let middle = &spec[8 * 513..9 * 513];
        let peak = middle
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 128);
    }

    #[test]
    fn test_stft_blocks_cover_every_frame() {
        let samples: Vec<f32> = (0..70_000).map(|i| ((i % 97) as f32 / 97.0) - 0.5).collect();
        let stft = StftProcessor::new(512, 128, WindowType::Hann);
        let num_frames = stft.num_frames(samples.len());
        assert!(num_frames > FRAMES_PER_BLOCK * 2);

        let frames_per_block = stft
            .map_frame_blocks(&samples, |block| block.len() / stft.num_bins())
            .unwrap();
        assert_eq!(frames_per_block.len(), num_frames.div_ceil(FRAMES_PER_BLOCK));
        assert!(frames_per_block[..frames_per_block.len() - 1]
            .iter()
            .all(|&n| n == FRAMES_PER_BLOCK));
        assert_eq!(frames_per_block.iter().sum::<usize>(), num_frames);

        // block results are identical from run to run
        let sums = || {
            stft.map_frame_blocks(&samples, |block| {
                block.iter().map(|&m| m as f64).sum::<f64>()
            })
            .unwrap()
        };
        assert_eq!(sums(), sums());
    }

    #[test]
    fn test_stft_empty_input() {
        let stft = StftProcessor::new(1024, 256, WindowType::Hann);
        let blocks = stft.map_frame_blocks(&[], |block| block.len()).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_hilbert_envelope_of_tone_is_flat() {
        // integer number of cycles: the analytic signal is exactly e^{jwt}
        let len = 1024;
        let amplitude = 0.5;
        let frame: Vec<f32> = (0..len)
            .map(|i| (amplitude * (2.0 * PI * 16.0 * i as f64 / len as f64).cos()) as f32)
            .collect();
        let hilbert = HilbertEnvelope::new(len);
        let mut buffers = hilbert.make_buffers();
        let mut envelope = vec![0.0; len];
        hilbert.compute(&frame, &mut buffers, &mut envelope).unwrap();

        for e in envelope {
            assert!((e - amplitude).abs() < 1e-5);
        }
    }

    #[test]
    fn test_hilbert_odd_length() {
        let len = 9;
        let frame: Vec<f32> = (0..len)
            .map(|i| (2.0 * PI * 2.0 * i as f64 / len as f64).sin() as f32)
            .collect();
        let hilbert = HilbertEnvelope::new(len);
        let mut buffers = hilbert.make_buffers();
        let mut envelope = vec![0.0; len];
        hilbert.compute(&frame, &mut buffers, &mut envelope).unwrap();

        for e in envelope {
            assert!((e - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_hilbert_size_mismatch() {
        let hilbert = HilbertEnvelope::new(16);
        let mut buffers = hilbert.make_buffers();
        let mut envelope = vec![0.0; 16];
        assert!(hilbert.compute(&[0.0; 15], &mut buffers, &mut envelope).is_err());
    }
}
