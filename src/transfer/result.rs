//! Solved transfer function and its scalar summaries.

use num_complex::Complex64;

/// Complex transfer function sampled on a frequency grid.
///
/// Holds both amplitude ratios produced by the solver: `uu` (surface over
/// within-bedrock motion) and `incident` (surface over rock-outcrop motion).
/// Immutable once built; the facade hands out references and rebuilds a
/// fresh result after any model mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferFunction {
    frequencies: Vec<f64>,
    tf_uu: Vec<Complex64>,
    tf_inc: Vec<Complex64>,
}

impl TransferFunction {
    /// Assemble from solver output. Lengths must agree; the solver guarantees
    /// this and that `frequencies` is strictly increasing.
    pub(crate) fn from_parts(
        frequencies: Vec<f64>,
        tf_uu: Vec<Complex64>,
        tf_inc: Vec<Complex64>,
    ) -> Self {
        debug_assert_eq!(frequencies.len(), tf_uu.len());
        debug_assert_eq!(frequencies.len(), tf_inc.len());
        Self {
            frequencies,
            tf_uu,
            tf_inc,
        }
    }

    /// Grid frequencies (Hz), strictly increasing.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Surface over within-bedrock amplitude ratio per frequency.
    pub fn uu(&self) -> &[Complex64] {
        &self.tf_uu
    }

    /// Surface over rock-outcrop amplitude ratio per frequency.
    pub fn incident(&self) -> &[Complex64] {
        &self.tf_inc
    }

    /// Number of frequency samples.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True when no samples are present.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// `|TF_uu|` per frequency.
    pub fn magnitude_uu(&self) -> Vec<f64> {
        self.tf_uu.iter().map(|c| c.norm()).collect()
    }

    /// `|TF_inc|` per frequency.
    pub fn magnitude_incident(&self) -> Vec<f64> {
        self.tf_inc.iter().map(|c| c.norm()).collect()
    }

    /// Peak of `|TF_uu|` over the solved grid.
    pub fn amplification_factor(&self) -> f64 {
        self.tf_uu[self.peak_index()].norm()
    }

    /// Frequency (Hz) at which `|TF_uu|` peaks.
    pub fn fundamental_frequency(&self) -> f64 {
        self.frequencies[self.peak_index()]
    }

    /// Linear interpolation of `TF_uu` at an arbitrary frequency.
    ///
    /// Returns zero outside the solved range, below as well as above: content
    /// the grid does not resolve is deliberately not reproduced. The DC bin
    /// of an FFT therefore always maps to zero.
    pub fn sample_uu_at(&self, frequency: f64) -> Complex64 {
        let zero = Complex64::new(0.0, 0.0);
        let f = &self.frequencies;
        if f.is_empty() || frequency < f[0] || frequency > f[f.len() - 1] {
            return zero;
        }
        // Index of the first grid point >= frequency; in [0, len-1] after
        // the range check above.
        let hi = f.partition_point(|&x| x < frequency);
        if hi == 0 {
            return self.tf_uu[0];
        }
        let lo = hi - 1;
        let t = (frequency - f[lo]) / (f[hi] - f[lo]);
        self.tf_uu[lo] + (self.tf_uu[hi] - self.tf_uu[lo]) * t
    }

    fn peak_index(&self) -> usize {
        let mut best = 0;
        let mut best_mag = f64::NEG_INFINITY;
        for (i, tf) in self.tf_uu.iter().enumerate() {
            let mag = tf.norm();
            if mag > best_mag {
                best_mag = mag;
                best = i;
            }
        }
        best
    }
}
