//! Signal preparation helpers

use std::f64::consts::PI;

/// Subtract the arithmetic mean from every sample.
///
/// Returns the removed offset. An empty signal is left untouched.
pub fn remove_dc(signal: &mut [f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let mean = signal.iter().sum::<f64>() / signal.len() as f64;
    for x in signal.iter_mut() {
        *x -= mean;
    }
    mean
}

/// Generate a sine wave at a given frequency and amplitude.
pub fn sine(freq_hz: f64, sample_rate: f64, num_samples: usize, amplitude: f64) -> Vec<f64> {
    (0..num_samples)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_dc_zeroes_mean() {
        let mut signal = vec![1.0, 2.0, 3.0, 6.0];
        let offset = remove_dc(&mut signal);
        assert_eq!(offset, 3.0);
        assert_eq!(signal, vec![-2.0, -1.0, 0.0, 3.0]);
    }

    #[test]
    fn remove_dc_on_empty_signal() {
        let mut signal: Vec<f64> = Vec::new();
        assert_eq!(remove_dc(&mut signal), 0.0);
    }

    #[test]
    fn sine_peak_amplitude() {
        let s = sine(250.0, 1000.0, 4, 2.0);
        assert!((s[1] - 2.0).abs() < 1e-12);
        assert!((s[3] + 2.0).abs() < 1e-12);
    }
}
