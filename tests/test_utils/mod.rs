// tests/test_utils/mod.rs
//
// Signal generators and file helpers shared by the integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

pub const SAMPLE_RATE: u32 = 44100;

/// Amplitude of a full-scale-referenced level in dBFS.
pub fn db_to_amplitude(dbfs: f64) -> f64 {
    10f64.powf(dbfs / 20.0)
}

pub fn sine(freq: f64, amplitude: f64, secs: f64, sample_rate: u32) -> Vec<f32> {
    let n = (secs * sample_rate as f64).round() as usize;
    (0..n)
        .map(|i| (amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin()) as f32)
        .collect()
}

/// Uniform white noise in [-amplitude, amplitude], reproducible per seed.
pub fn white_noise(amplitude: f64, secs: f64, sample_rate: u32, seed: u64) -> Vec<f32> {
    let n = (secs * sample_rate as f64).round() as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (amplitude * rng.gen_range(-1.0..1.0)) as f32)
        .collect()
}

pub fn silence(secs: f64, sample_rate: u32) -> Vec<f32> {
    vec![0.0; (secs * sample_rate as f64).round() as usize]
}

/// Interleave per-channel buffers of equal length.
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut out = Vec::with_capacity(len * channels.len());
    for i in 0..len {
        for channel in channels {
            out.push(channel[i]);
        }
    }
    out
}

/// Write interleaved samples as a 16-bit PCM WAV file.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) -> PathBuf {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV file");
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(v).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV file");
    path.to_path_buf()
}
