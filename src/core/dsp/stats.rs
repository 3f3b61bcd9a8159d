//! Statistical helpers used by the analyzers

/// Percentile with linear interpolation between closest ranks.
///
/// `p` is in percent (0..=100). The rank of the result is `p / 100 * (n - 1)`
/// over the sorted values, matching the common "linear" definition.
/// Returns `None` for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Arithmetic mean accumulated in index order. `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

/// Convert a magnitude to dB relative to `reference`, clamping both at `amin`
/// so that zero bins stay finite.
pub fn amplitude_to_db(magnitude: f64, reference: f64, amin: f64) -> f64 {
    20.0 * magnitude.max(amin).log10() - 20.0 * reference.max(amin).log10()
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}
