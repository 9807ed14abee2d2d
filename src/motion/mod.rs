//! Time-domain ground motions and frequency-domain convolution.
//!
//! [`TimeHistory`] carries a uniformly sampled acceleration record.
//! [`convolve_surface_motion`] pushes a bedrock record through a solved
//! transfer function: FFT, multiply by the interpolated transfer function,
//! inverse FFT, real part.

mod convolve;
mod time_history;

pub use convolve::{
    convolve_surface_motion, convolve_surface_motion_with_spectra, fft_bin_frequencies,
    ConvolutionSpectra,
};
pub use time_history::TimeHistory;

use thiserror::Error;

/// Errors from time-history construction.
#[derive(Debug, Error, PartialEq)]
pub enum TimeHistoryError {
    /// A record needs at least two samples.
    #[error("time history needs at least 2 samples, got {found}")]
    TooFewSamples {
        /// Number of samples supplied.
        found: usize,
    },

    /// Sampling interval must be positive and finite.
    #[error("time step must be positive and finite, got {value}")]
    NonPositiveTimeStep {
        /// Rejected time step (s).
        value: f64,
    },

    /// Time and acceleration columns must have equal length.
    #[error("time and acceleration lengths differ: {times} vs {values}")]
    LengthMismatch {
        /// Number of time samples.
        times: usize,
        /// Number of acceleration samples.
        values: usize,
    },

    /// Time values must be strictly increasing.
    #[error("time is not strictly increasing at index {index}")]
    TimeNotIncreasing {
        /// First index that breaks the ordering.
        index: usize,
    },

    /// All samples must be finite.
    #[error("non-finite sample at index {index}")]
    NonFiniteSample {
        /// Index of the offending sample.
        index: usize,
    },
}

/// Errors from frequency-domain convolution.
#[derive(Debug, Error, PartialEq)]
pub enum ConvolveError {
    /// The inverse transform produced a non-finite sample.
    #[error("surface motion is not finite at sample {bin}")]
    NonFinite {
        /// Index of the first bad sample.
        bin: usize,
    },
}
