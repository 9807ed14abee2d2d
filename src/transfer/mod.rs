//! Transfer-function solver for vertically propagating shear waves.
//!
//! A soil column over an elastic half-space filters bedrock motion on its
//! way to the surface. For each angular frequency ω the column is collapsed
//! into a single 2×2 complex matrix by chaining per-layer propagation
//! matrices; the surface/bedrock amplitude ratios fall out of the matrix
//! entries. Solving over a [`FrequencyGrid`] yields a [`TransferFunction`]
//! that downstream code samples, convolves, or reduces to scalar summaries.

mod grid;
mod result;
mod solver;

pub use grid::{FrequencyGrid, DEFAULT_F_MAX, DEFAULT_N_FREQS, MIN_FREQUENCY};
pub use result::TransferFunction;
pub use solver::solve_transfer;
#[cfg(feature = "parallel")]
pub use solver::solve_transfer_parallel;

pub(crate) use solver::{layer_matrix, transfer_ratios, Mat2};

use thiserror::Error;

/// Errors from grid construction and transfer-function evaluation.
#[derive(Debug, Error, PartialEq)]
pub enum TransferError {
    /// Frequency grid has no points.
    #[error("frequency grid is empty")]
    EmptyGrid,

    /// Upper frequency bound does not exceed the grid floor.
    #[error("maximum frequency {value} Hz must exceed {MIN_FREQUENCY} Hz")]
    MaxFrequencyTooLow {
        /// Rejected bound (Hz).
        value: f64,
    },

    /// A linspace grid needs at least two points.
    #[error("frequency grid needs at least 2 points, got {value}")]
    TooFewFrequencies {
        /// Rejected point count.
        value: usize,
    },

    /// Grid frequencies must be positive and finite.
    #[error("frequency at index {index} must be positive and finite, got {value}")]
    NonPositiveFrequency {
        /// Offending grid index.
        index: usize,
        /// Offending frequency (Hz).
        value: f64,
    },

    /// Grid frequencies must be strictly increasing.
    #[error("frequency grid is not strictly increasing at index {index}")]
    UnsortedGrid {
        /// First index that breaks the ordering.
        index: usize,
    },

    /// The solver produced a non-finite amplitude ratio.
    #[error("transfer function is not finite at index {index} ({frequency} Hz)")]
    NonFinite {
        /// Grid index of the bad sample.
        index: usize,
        /// Frequency of the bad sample (Hz).
        frequency: f64,
    },
}
