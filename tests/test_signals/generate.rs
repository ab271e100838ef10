use std::f32::consts::PI;

/// Sine tone of `amplitude` at `freq_hz`
pub fn sine(duration_secs: f32, sample_rate: u32, freq_hz: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * freq_hz * t).sin()
        })
        .collect()
}

/// Two-channel test signal: left is a tone, right ramps linearly from -1.2 to 1.2
/// so it overshoots the nominal range at both ends.
pub fn stereo_sweep(duration_secs: f32, sample_rate: u32) -> Vec<Vec<f32>> {
    let left = sine(duration_secs, sample_rate, 440.0, 0.8);
    let n = left.len();
    let right = (0..n)
        .map(|i| {
            let x = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            -1.2 + 2.4 * x
        })
        .collect();
    vec![left, right]
}

/// Frame-major interleaving of planar channels
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels.first().map_or(0, Vec::len);
    (0..frames)
        .flat_map(|f| channels.iter().map(move |c| c[f]))
        .collect()
}
