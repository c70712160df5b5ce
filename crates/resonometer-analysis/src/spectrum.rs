//! One-sided power spectra and band integration

use crate::fft::{Fft, Normalization};
use serde::{Deserialize, Serialize};

/// Closed frequency interval in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    /// Lower bound in Hz.
    pub min_hz: f64,
    /// Upper bound in Hz.
    pub max_hz: f64,
}

impl FrequencyRange {
    /// Create a new range.
    pub fn new(min_hz: f64, max_hz: f64) -> Self {
        Self { min_hz, max_hz }
    }

    /// True if `freq` lies within `[min_hz, max_hz]`.
    pub fn contains(&self, freq: f64) -> bool {
        freq >= self.min_hz && freq <= self.max_hz
    }
}

impl std::fmt::Display for FrequencyRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.1}, {:.1}] Hz", self.min_hz, self.max_hz)
    }
}

/// Power per non-negative frequency bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    /// Bin frequencies in Hz (`k * sample_rate / n`).
    pub frequencies: Vec<f64>,
    /// Power per bin.
    pub power: Vec<f64>,
}

impl Spectrum {
    /// Periodogram of a full signal: `|X_k|^2 / n`, not folded.
    ///
    /// Used for locating the dominant frequency, where only the position of
    /// the maximum matters.
    pub fn periodogram(signal: &[f64], sample_rate: f64) -> Self {
        let fft = Fft::new(signal.len());
        let n = signal.len() as f64;
        let power = fft
            .power(signal, Normalization::Backward)
            .into_iter()
            .map(|p| p / n)
            .collect();
        Self {
            frequencies: fft.frequencies(sample_rate),
            power,
        }
    }

    /// Energy-preserving one-sided spectrum of a segment, per second of window.
    ///
    /// Orthonormal transform, interior bins doubled to account for the
    /// discarded negative frequencies, everything divided by `width_s`.
    pub fn band_density(fft: &Fft, segment: &[f64], sample_rate: f64, width_s: f64) -> Self {
        let power = fold_one_sided(fft.power(segment, Normalization::Ortho), fft.size(), width_s);
        Self {
            frequencies: fft.frequencies(sample_rate),
            power,
        }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.power.len()
    }

    /// True if the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Index and frequency of the bin with maximum power (first on ties).
    pub fn peak(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &p) in self.power.iter().enumerate() {
            match best {
                Some((_, bp)) if p <= bp => {}
                _ => best = Some((i, p)),
            }
        }
        best.map(|(i, _)| (i, self.frequencies[i]))
    }

    /// Sum of power over bins `[start, end)`, clamped to the spectrum.
    pub fn band_power(&self, start: usize, end: usize) -> f64 {
        let end = end.min(self.power.len());
        if start >= end {
            return 0.0;
        }
        self.power[start..end].iter().sum()
    }

    /// Bins whose frequency lies within `range`.
    pub fn restrict(&self, range: FrequencyRange) -> Spectrum {
        let (frequencies, power) = self
            .frequencies
            .iter()
            .zip(&self.power)
            .filter(|&(&f, _)| range.contains(f))
            .map(|(&f, &p)| (f, p))
            .unzip();
        Spectrum { frequencies, power }
    }
}

/// Index of the value in `frequencies` closest to `freq` (first on ties).
pub(crate) fn nearest_bin(frequencies: &[f64], freq: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &f) in frequencies.iter().enumerate() {
        let d = (f - freq).abs();
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Fold an orthonormal half spectrum into power per second of window.
fn fold_one_sided(mut power: Vec<f64>, fft_size: usize, width_s: f64) -> Vec<f64> {
    let last = power.len().saturating_sub(1);
    let nyquist_is_unique = fft_size % 2 == 0;
    for (k, p) in power.iter_mut().enumerate() {
        let unique = k == 0 || (k == last && nyquist_is_unique);
        let factor = if unique { 1.0 } else { 2.0 };
        *p *= factor / width_s;
    }
    power
}
