//! Frequency grids for transfer-function evaluation.

use super::TransferError;

/// Floor frequency (Hz) for generated grids.
///
/// ω = 0 is a degenerate point: every layer phase vanishes and the Rayleigh
/// mass term a₀/(2ω) diverges, so generated grids start here instead of at
/// zero. Convolution treats anything below the grid as unresolved.
pub const MIN_FREQUENCY: f64 = 1e-6;

/// Default upper frequency bound (Hz).
pub const DEFAULT_F_MAX: f64 = 20.0;

/// Default number of grid points.
pub const DEFAULT_N_FREQS: usize = 2000;

/// Strictly increasing set of positive frequencies (Hz).
///
/// The usual construction is a uniform grid from [`MIN_FREQUENCY`] to an
/// upper bound via [`FrequencyGrid::new`]; arbitrary grids go through
/// [`FrequencyGrid::from_frequencies`]. Both constructors enforce ordering
/// and positivity, which the interpolation in
/// [`TransferFunction::sample_uu_at`](super::TransferFunction::sample_uu_at)
/// relies on.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyGrid {
    frequencies: Vec<f64>,
}

impl FrequencyGrid {
    /// Uniform grid of `n_freqs` points from [`MIN_FREQUENCY`] to `f_max`.
    ///
    /// # Errors
    /// [`TransferError::MaxFrequencyTooLow`] when `f_max` is not finite or
    /// does not exceed the floor; [`TransferError::TooFewFrequencies`] when
    /// `n_freqs < 2`.
    pub fn new(f_max: f64, n_freqs: usize) -> Result<Self, TransferError> {
        if !f_max.is_finite() || f_max <= MIN_FREQUENCY {
            return Err(TransferError::MaxFrequencyTooLow { value: f_max });
        }
        if n_freqs < 2 {
            return Err(TransferError::TooFewFrequencies { value: n_freqs });
        }
        Ok(Self::linspace(f_max, n_freqs))
    }

    /// Grid from explicit frequencies.
    ///
    /// # Errors
    /// [`TransferError::EmptyGrid`] for an empty list;
    /// [`TransferError::NonPositiveFrequency`] for a zero, negative, or
    /// non-finite entry; [`TransferError::UnsortedGrid`] when the list is
    /// not strictly increasing.
    pub fn from_frequencies(frequencies: Vec<f64>) -> Result<Self, TransferError> {
        if frequencies.is_empty() {
            return Err(TransferError::EmptyGrid);
        }
        for (index, &value) in frequencies.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(TransferError::NonPositiveFrequency { index, value });
            }
        }
        if let Some(index) = (1..frequencies.len()).find(|&i| frequencies[i] <= frequencies[i - 1])
        {
            return Err(TransferError::UnsortedGrid { index });
        }
        Ok(Self { frequencies })
    }

    /// Same point count, new upper bound.
    pub fn with_f_max(&self, f_max: f64) -> Result<Self, TransferError> {
        Self::new(f_max, self.len())
    }

    /// Grid frequencies, strictly increasing.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Highest grid frequency (Hz).
    pub fn f_max(&self) -> f64 {
        self.frequencies[self.frequencies.len() - 1]
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// A grid is never empty; provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn linspace(f_max: f64, n_freqs: usize) -> Self {
        let step = (f_max - MIN_FREQUENCY) / (n_freqs - 1) as f64;
        let frequencies = (0..n_freqs)
            .map(|i| MIN_FREQUENCY + step * i as f64)
            .collect();
        Self { frequencies }
    }
}

impl Default for FrequencyGrid {
    /// Uniform grid of [`DEFAULT_N_FREQS`] points up to [`DEFAULT_F_MAX`] Hz.
    fn default() -> Self {
        Self::linspace(DEFAULT_F_MAX, DEFAULT_N_FREQS)
    }
}
