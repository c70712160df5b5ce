//! Time-window extraction
//!
//! Windows are specified in seconds and aligned to samples. The window length
//! is always floored to an even number of samples so the half-spectrum
//! transform downstream has a well-defined Nyquist bin.

use crate::fft::Window;
use crate::{AnalysisError, Result};

/// A weighted slice of a signal together with the window that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Index of the first sample in the source signal.
    pub start: usize,
    /// Windowed samples.
    pub samples: Vec<f64>,
    /// Window coefficients applied to `samples`.
    pub coefficients: Vec<f64>,
}

impl Segment {
    /// Number of samples in the segment.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the segment holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Window width in samples, floored to an even count.
pub fn even_window_len(width_s: f64, sample_rate: f64) -> usize {
    let samples = (width_s * sample_rate).floor();
    if !samples.is_finite() || samples < 0.0 {
        return 0;
    }
    2 * ((samples as usize) / 2)
}

/// First sample of a window starting at `start_s`.
pub fn start_sample(start_s: f64, sample_rate: f64) -> usize {
    (start_s * sample_rate).floor().max(0.0) as usize
}

/// Extract `[start, start + width)` from `signal` and apply `window`.
///
/// Fails if the window rounds to fewer than two samples or if the segment
/// would run past the end of the signal.
pub fn extract_segment(
    signal: &[f64],
    sample_rate: f64,
    start_s: f64,
    width_s: f64,
    window: Window,
) -> Result<Segment> {
    let len = even_window_len(width_s, sample_rate);
    if len < 2 {
        return Err(AnalysisError::WindowTooShort {
            width_s,
            sample_rate,
        });
    }
    let start = start_sample(start_s, sample_rate);
    segment_at(signal, start, len, window)
}

/// Extract `len` samples starting at sample `start` and apply `window`.
fn segment_at(
    signal: &[f64],
    start: usize,
    len: usize,
    window: Window,
) -> Result<Segment> {
    let end = start + len;
    let Some(slice) = signal.get(start..end) else {
        return Err(AnalysisError::SegmentOutOfBounds {
            start,
            end,
            len: signal.len(),
        });
    };

    let coefficients = window.coefficients(len);
    let samples = slice
        .iter()
        .zip(&coefficients)
        .map(|(&x, &w)| x * w)
        .collect();

    Ok(Segment {
        start,
        samples,
        coefficients,
    })
}
