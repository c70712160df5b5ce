//! Audio input layer for Resonometer.
//!
//! This crate provides:
//!
//! - **Recording input**: [`read_recording`] loads the first channel of a WAV
//!   file in raw sample units together with its full-scale value
//! - **Test tones**: [`write_wav`] writes interleaved raw samples, used for
//!   fixtures and the `generate` command
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use resonometer_io::read_recording;
//!
//! let recording = read_recording("bottle_01.wav")?;
//! println!(
//!     "{}: {} samples at {} Hz, full scale {}",
//!     recording.name,
//!     recording.samples.len(),
//!     recording.sample_rate,
//!     recording.full_scale()
//! );
//! ```

mod wav;

pub use wav::{Recording, WavFormat, WavSpec, full_scale_value, read_recording, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The file holds a header but no sample frames.
    #[error("WAV file contains no samples")]
    NoSamples,
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
