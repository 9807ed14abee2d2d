//! Layer-matrix recursion for a soil column over an elastic half-space.
//!
//! For a column of `n` layers, each layer `j` contributes a 2×2 complex
//! matrix built from three ingredients at angular frequency ω:
//!
//! - viscoelastic correction `c = sqrt(1 + 2i·ζ(ω))`
//! - complex phase `r = ω·h/vs · c`
//! - impedance ratio `α = (ρ·vs)_j / (ρ·vs)_{j+1}` (medium `n` is the rock)
//!
//! The column matrix is the ordered product `L_{n-1}·…·L_1·L_0`: the surface
//! layer enters first, the deepest layer is applied last, matching the
//! physical transmission of the wave from the half-space upward. The two
//! amplitude ratios read off the total matrix are
//!
//! - `TF_uu = 2 / (m00 + m01 + m10 + m11)` — surface over base-of-column
//!   (within) motion
//! - `TF_inc = 1 / (m00 + m01)` — surface over twice the incident amplitude,
//!   i.e. over the motion of a free rock outcrop

use std::f64::consts::PI;

use num_complex::Complex64;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::profile::{RockHalfspace, SoilLayer, SoilProfile};

use super::{FrequencyGrid, TransferError, TransferFunction};

/// 2×2 complex matrix in row-major entry naming.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Mat2 {
    pub m00: Complex64,
    pub m01: Complex64,
    pub m10: Complex64,
    pub m11: Complex64,
}

impl Mat2 {
    pub(crate) fn identity() -> Self {
        Self {
            m00: Complex64::new(1.0, 0.0),
            m01: Complex64::new(0.0, 0.0),
            m10: Complex64::new(0.0, 0.0),
            m11: Complex64::new(1.0, 0.0),
        }
    }

    /// Matrix product `self · rhs`.
    pub(crate) fn mul(&self, rhs: &Mat2) -> Mat2 {
        Mat2 {
            m00: self.m00 * rhs.m00 + self.m01 * rhs.m10,
            m01: self.m00 * rhs.m01 + self.m01 * rhs.m11,
            m10: self.m10 * rhs.m00 + self.m11 * rhs.m10,
            m11: self.m10 * rhs.m01 + self.m11 * rhs.m11,
        }
    }
}

/// Propagation matrix of one layer at angular frequency `omega`.
///
/// `below_impedance` is ρ·vs of the medium directly underneath, either the
/// next soil layer or the rock half-space.
pub(crate) fn layer_matrix(layer: &SoilLayer, below_impedance: f64, omega: f64) -> Mat2 {
    let correction = layer.damping.viscoelastic_correction(omega);
    let r = correction * (omega * layer.thickness / layer.vs);
    let alpha = layer.impedance() / below_impedance;

    let e_up = (Complex64::i() * r).exp();
    let e_down = (-Complex64::i() * r).exp();
    let sum = 0.5 * (1.0 + alpha);
    let diff = 0.5 * (1.0 - alpha);

    Mat2 {
        m00: sum * e_up,
        m01: diff * e_down,
        m10: diff * e_up,
        m11: sum * e_down,
    }
}

/// Surface/within and surface/outcrop amplitude ratios of a column matrix.
pub(crate) fn transfer_ratios(total: &Mat2) -> (Complex64, Complex64) {
    let two = Complex64::new(2.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    let uu = two / (total.m00 + total.m01 + total.m10 + total.m11);
    let inc = one / (total.m00 + total.m01);
    (uu, inc)
}

/// Total column matrix `L_{n-1}·…·L_0` at angular frequency `omega`.
fn column_matrix(layers: &[SoilLayer], rock: &RockHalfspace, omega: f64) -> Mat2 {
    let mut total = Mat2::identity();
    for (j, layer) in layers.iter().enumerate() {
        let below = layers
            .get(j + 1)
            .map_or(rock.impedance(), SoilLayer::impedance);
        total = layer_matrix(layer, below, omega).mul(&total);
    }
    total
}

/// Solve the transfer function of `profile` over `rock` on `grid`.
///
/// One independent 2×2 matrix chain per grid frequency.
///
/// # Errors
/// [`TransferError::NonFinite`] if either amplitude ratio evaluates to
/// `NaN`/`Inf` at some frequency; the error names the first bad sample.
pub fn solve_transfer(
    profile: &SoilProfile,
    rock: &RockHalfspace,
    grid: &FrequencyGrid,
) -> Result<TransferFunction, TransferError> {
    let mut tf_uu = Vec::with_capacity(grid.len());
    let mut tf_inc = Vec::with_capacity(grid.len());

    for (index, &frequency) in grid.frequencies().iter().enumerate() {
        let omega = 2.0 * PI * frequency;
        let total = column_matrix(profile.layers(), rock, omega);
        let (uu, inc) = transfer_ratios(&total);
        if !uu.is_finite() || !inc.is_finite() {
            return Err(TransferError::NonFinite { index, frequency });
        }
        tf_uu.push(uu);
        tf_inc.push(inc);
    }

    Ok(TransferFunction::from_parts(
        grid.frequencies().to_vec(),
        tf_uu,
        tf_inc,
    ))
}

/// Solve the transfer function with the frequency loop run on rayon.
///
/// Frequencies are independent, so this matches [`solve_transfer`] exactly.
/// Enable with the `parallel` feature.
#[cfg(feature = "parallel")]
pub fn solve_transfer_parallel(
    profile: &SoilProfile,
    rock: &RockHalfspace,
    grid: &FrequencyGrid,
) -> Result<TransferFunction, TransferError> {
    let samples: Result<Vec<(Complex64, Complex64)>, TransferError> = grid
        .frequencies()
        .par_iter()
        .enumerate()
        .map(|(index, &frequency)| {
            let omega = 2.0 * PI * frequency;
            let total = column_matrix(profile.layers(), rock, omega);
            let (uu, inc) = transfer_ratios(&total);
            if uu.is_finite() && inc.is_finite() {
                Ok((uu, inc))
            } else {
                Err(TransferError::NonFinite { index, frequency })
            }
        })
        .collect();

    let (tf_uu, tf_inc) = samples?.into_iter().unzip();
    Ok(TransferFunction::from_parts(
        grid.frequencies().to_vec(),
        tf_uu,
        tf_inc,
    ))
}
