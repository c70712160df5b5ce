//! FFT wrapper with windowing functions

use rustfft::{FftPlanner, num_complex::Complex};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Window {
    /// Rectangular (uniform weights)
    #[default]
    Rectangular,
    /// Hann window (raised cosine)
    Hann,
}

impl Window {
    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f64]) {
        let n = buffer.len();
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos());
                    *sample *= w;
                }
            }
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}

/// Scaling applied to the forward transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Unscaled forward transform.
    Backward,
    /// Forward transform scaled by `1 / sqrt(n)` (energy preserving).
    Ortho,
}

/// Real-input FFT processor for a fixed size
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of non-negative frequency bins (`size / 2 + 1`)
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Perform forward FFT on real input
    ///
    /// Input shorter than the FFT size is zero padded, longer input is
    /// truncated. Returns the `size / 2 + 1` bins from DC to Nyquist.
    pub fn forward(&self, input: &[f64], normalization: Normalization) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer.truncate(self.num_bins());
        if normalization == Normalization::Ortho && self.size > 0 {
            let scale = 1.0 / (self.size as f64).sqrt();
            for c in &mut buffer {
                *c *= scale;
            }
        }
        buffer
    }

    /// Squared magnitude of [`Fft::forward`] per bin
    pub fn power(&self, input: &[f64], normalization: Normalization) -> Vec<f64> {
        self.forward(input, normalization)
            .iter()
            .map(|c| c.norm_sqr())
            .collect()
    }

    /// Frequencies of the non-negative bins for a given sample rate
    pub fn frequencies(&self, sample_rate: f64) -> Vec<f64> {
        let bin_width = sample_rate / self.size as f64;
        (0..self.num_bins()).map(|k| k as f64 * bin_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ortho_preserves_energy() {
        // Even-length real signal: Parseval over the full spectrum equals the
        // interior bins counted twice plus DC and Nyquist once.
        let input: Vec<f64> = (0..64)
            .map(|i| (2.0 * PI * 5.0 * i as f64 / 64.0).sin() + 0.25)
            .collect();
        let fft = Fft::new(64);
        let power = fft.power(&input, Normalization::Ortho);

        let last = power.len() - 1;
        let spectral: f64 = power[0] + power[last] + 2.0 * power[1..last].iter().sum::<f64>();
        let temporal: f64 = input.iter().map(|x| x * x).sum();
        assert!((spectral - temporal).abs() < 1e-9, "{spectral} vs {temporal}");
    }

    #[test]
    fn test_window_hann() {
        let coeffs = Window::Hann.coefficients(100);

        // Hann window should be 0 at the start, 1 at center
        assert!(coeffs[0] < 0.01);
        assert!((coeffs[50] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_rectangular_is_uniform() {
        assert!(Window::Rectangular.coefficients(16).iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_dc_detection() {
        let fft = Fft::new(256);
        let spectrum = fft.forward(&[1.0; 256], Normalization::Backward);

        assert_eq!(spectrum.len(), 129);
        assert!((spectrum[0].re - 256.0).abs() < 1e-9);
        let other: f64 = spectrum[1..].iter().map(|c| c.norm()).sum();
        assert!(other < 1e-6);
    }

    #[test]
    fn test_frequencies() {
        let fft = Fft::new(8);
        assert_eq!(fft.frequencies(800.0), vec![0.0, 100.0, 200.0, 300.0, 400.0]);
    }
}
