//! Sliding-window band power around a fixed resonance
//!
//! A window of constant width is stepped across the signal. For every step
//! the windowed segment is transformed, and the one-sided power between the
//! band edges around the resonance is summed.
//!
//! Every window has the same length, so the frequency grid and the band bin
//! indices are fixed per analyzer and computed once in [`SlidingAnalyzer::new`].

use crate::fft::{Fft, Window};
use crate::segment::{even_window_len, start_sample};
use crate::spectrum::{Spectrum, nearest_bin};
use crate::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// How the lower band edge bin is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandEdge {
    /// The bin nearest the lower edge, minus one. Matches the levels of the
    /// established bottle calibration, which include one extra bin below the
    /// band.
    #[default]
    Legacy,
    /// The bin nearest the lower edge.
    Symmetric,
}

/// Parameters of the sliding analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidingParams {
    /// Window width in seconds.
    pub window_width_s: f64,
    /// Step between windows as a multiple of the width.
    pub step_fraction: f64,
    /// Width of the integration band around the resonance, in Hz.
    pub band_width_hz: f64,
    /// Lower band edge rule.
    pub band_edge: BandEdge,
    /// Window function applied to each segment.
    pub window: Window,
}

impl Default for SlidingParams {
    fn default() -> Self {
        Self {
            window_width_s: 0.035,
            step_fraction: 0.5,
            band_width_hz: 120.0,
            band_edge: BandEdge::Legacy,
            window: Window::Rectangular,
        }
    }
}

/// Integrated band power of one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPower {
    /// Window start in seconds.
    pub time_s: f64,
    /// Power summed over the band.
    pub power: f64,
}

/// Sliding band-power analyzer for one sample rate and resonance.
pub struct SlidingAnalyzer {
    params: SlidingParams,
    sample_rate: f64,
    resonance_hz: f64,
    window_len: usize,
    step_s: f64,
    fft: Fft,
    band: (usize, usize),
}

impl SlidingAnalyzer {
    /// Validate parameters, plan the FFT and locate the band bins.
    pub fn new(sample_rate: f64, resonance_hz: f64, params: SlidingParams) -> Result<Self> {
        positive("sample_rate", sample_rate)?;
        positive("window_width_s", params.window_width_s)?;
        positive("step_fraction", params.step_fraction)?;
        positive("band_width_hz", params.band_width_hz)?;
        if !(resonance_hz.is_finite() && resonance_hz >= 0.0) {
            return Err(AnalysisError::invalid(
                "resonance_hz",
                format!("must be a non-negative frequency, got {resonance_hz}"),
            ));
        }

        let window_len = even_window_len(params.window_width_s, sample_rate);
        if window_len < 2 {
            return Err(AnalysisError::WindowTooShort {
                width_s: params.window_width_s,
                sample_rate,
            });
        }

        let fft = Fft::new(window_len);
        let frequencies = fft.frequencies(sample_rate);
        let half_band = params.band_width_hz / 2.0;
        let upper = nearest_bin(&frequencies, resonance_hz + half_band).unwrap_or(0);
        let lower = nearest_bin(&frequencies, resonance_hz - half_band).unwrap_or(0);
        let lower = match params.band_edge {
            BandEdge::Legacy => lower.saturating_sub(1),
            BandEdge::Symmetric => lower,
        };

        tracing::debug!(
            window_len,
            resonance_hz,
            lower_bin = lower,
            upper_bin = upper,
            bin_width_hz = sample_rate / window_len as f64,
            "sliding analyzer ready"
        );

        Ok(Self {
            params,
            sample_rate,
            resonance_hz,
            window_len,
            step_s: params.step_fraction * params.window_width_s,
            fft,
            band: (lower, upper),
        })
    }

    /// Parameters the analyzer was built with.
    pub fn params(&self) -> &SlidingParams {
        &self.params
    }

    /// Resonance frequency the band is centred on.
    pub fn resonance_hz(&self) -> f64 {
        self.resonance_hz
    }

    /// Window length in samples (even).
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Step between window starts in seconds.
    pub fn step_s(&self) -> f64 {
        self.step_s
    }

    /// Band bins `[lower, upper)` summed at every step.
    pub fn band_bins(&self) -> (usize, usize) {
        self.band
    }

    /// Frequency grid of every window spectrum.
    pub fn frequencies(&self) -> Vec<f64> {
        self.fft.frequencies(self.sample_rate)
    }

    /// Iterate over band powers of `signal`.
    ///
    /// The iterator is lazy and borrows both the analyzer and the signal;
    /// calling `steps` again restarts from the first window.
    pub fn steps<'a>(&'a self, signal: &'a [f64]) -> SlidingSteps<'a> {
        SlidingSteps {
            analyzer: self,
            signal,
            duration_s: signal.len() as f64 / self.sample_rate,
            index: 0,
        }
    }

    /// Band power of one window of exactly `window_len` samples.
    fn band_power_of(&self, window: &[f64]) -> f64 {
        let mut segment = window.to_vec();
        self.params.window.apply(&mut segment);
        let (lower, upper) = self.band;
        Spectrum::band_density(
            &self.fft,
            &segment,
            self.sample_rate,
            self.params.window_width_s,
        )
        .band_power(lower, upper)
    }
}

/// Lazy sequence of [`BandPower`] values, see [`SlidingAnalyzer::steps`].
pub struct SlidingSteps<'a> {
    analyzer: &'a SlidingAnalyzer,
    signal: &'a [f64],
    duration_s: f64,
    index: usize,
}

impl Iterator for SlidingSteps<'_> {
    type Item = BandPower;

    fn next(&mut self) -> Option<BandPower> {
        let analyzer = self.analyzer;
        let time_s = self.index as f64 * analyzer.step_s;
        // Tolerate rounding in k * step so the last full window is kept.
        if time_s + analyzer.params.window_width_s > self.duration_s + 1e-9 {
            return None;
        }

        let start = start_sample(time_s, analyzer.sample_rate);
        let end = start + analyzer.window_len;
        if end > self.signal.len() {
            return None;
        }

        let power = analyzer.band_power_of(&self.signal[start..end]);
        self.index += 1;
        Some(BandPower { time_s, power })
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::invalid(
            name,
            format!("must be positive, got {value}"),
        ))
    }
}
