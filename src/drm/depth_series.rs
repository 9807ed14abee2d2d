//! Depth-indexed transfer functions and motions.
//!
//! For a refined profile of `n` layers there are `n + 1` start depths: the
//! top of each layer plus the base of the column (the rock surface). The
//! transfer function at start depth `i` treats that depth as the surface and
//! solves the remaining column `[i..]` down to rock.
//!
//! Solving each start depth from scratch repeats the bottom part of the
//! matrix chain `n` times. The column matrix of the sub-profile `[i..]` is
//! the suffix product `S_i = L_{n-1}·…·L_i` with `S_n = I`, and
//! `S_i = S_{i+1}·L_i`, so one bottom-up sweep per frequency yields every
//! depth at once.

use std::f64::consts::PI;

use num_complex::Complex64;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::motion::{convolve_surface_motion, ConvolveError, TimeHistory};
use crate::profile::{RockHalfspace, SoilLayer, SoilProfile};
use crate::transfer::{layer_matrix, transfer_ratios, FrequencyGrid, Mat2, TransferError, TransferFunction};

/// Family of transfer functions indexed by start depth.
///
/// Entry 0 is the ground surface; the last entry is the rock surface, where
/// both ratios are identically one. Produced by [`depth_transfer_set`] from
/// a refined profile so that every mesh depth owns an entry.
#[derive(Clone, Debug)]
pub struct DepthTransferSet {
    start_depths: Vec<f64>,
    transfers: Vec<TransferFunction>,
}

impl DepthTransferSet {
    /// Start depths (m from the surface), ascending; first is 0, last is
    /// the profile's total depth.
    pub fn start_depths(&self) -> &[f64] {
        &self.start_depths
    }

    /// Transfer functions, one per start depth.
    pub fn transfers(&self) -> &[TransferFunction] {
        &self.transfers
    }

    /// Transfer function at the ground surface.
    pub fn surface(&self) -> &TransferFunction {
        &self.transfers[0]
    }

    /// Number of start depths.
    pub fn len(&self) -> usize {
        self.start_depths.len()
    }

    /// A set always holds at least the surface and the rock top.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Motion at one start depth, produced by [`depth_motions`].
#[derive(Clone, Debug)]
pub struct DepthMotion {
    /// Start depth (m from the surface).
    pub start_depth: f64,
    /// Acceleration history at that depth.
    pub motion: TimeHistory,
}

/// Amplitude ratios at every start depth for one angular frequency,
/// surface first. One bottom-up suffix sweep over the layer matrices.
fn suffix_ratios(
    layers: &[SoilLayer],
    rock: &RockHalfspace,
    omega: f64,
) -> Vec<(Complex64, Complex64)> {
    let n = layers.len();
    let one = Complex64::new(1.0, 0.0);
    let mut out = vec![(one, one); n + 1];

    let mut suffix = Mat2::identity();
    for i in (0..n).rev() {
        let below = layers
            .get(i + 1)
            .map_or(rock.impedance(), SoilLayer::impedance);
        suffix = suffix.mul(&layer_matrix(&layers[i], below, omega));
        out[i] = transfer_ratios(&suffix);
    }
    out
}

fn assemble(
    profile: &SoilProfile,
    grid: &FrequencyGrid,
    columns: Vec<Vec<(Complex64, Complex64)>>,
) -> DepthTransferSet {
    let n_depths = profile.len() + 1;
    let mut tf_uu = vec![Vec::with_capacity(grid.len()); n_depths];
    let mut tf_inc = vec![Vec::with_capacity(grid.len()); n_depths];
    for column in columns {
        for (i, (uu, inc)) in column.into_iter().enumerate() {
            tf_uu[i].push(uu);
            tf_inc[i].push(inc);
        }
    }

    let transfers = tf_uu
        .into_iter()
        .zip(tf_inc)
        .map(|(uu, inc)| TransferFunction::from_parts(grid.frequencies().to_vec(), uu, inc))
        .collect();

    let mut start_depths = Vec::with_capacity(n_depths);
    start_depths.push(0.0);
    start_depths.extend(profile.interface_depths());

    DepthTransferSet {
        start_depths,
        transfers,
    }
}

/// Solve the transfer function at every start depth of `profile`.
///
/// Equivalent to solving each truncated sub-profile separately, but the
/// per-frequency suffix sweep makes the whole family cost one extra matrix
/// multiply per layer over a single surface solve.
///
/// # Errors
/// [`TransferError::NonFinite`] if any ratio at any depth evaluates to
/// `NaN`/`Inf`; the error names the first bad frequency sample.
pub fn depth_transfer_set(
    profile: &SoilProfile,
    rock: &RockHalfspace,
    grid: &FrequencyGrid,
) -> Result<DepthTransferSet, TransferError> {
    let mut columns = Vec::with_capacity(grid.len());
    for (index, &frequency) in grid.frequencies().iter().enumerate() {
        let omega = 2.0 * PI * frequency;
        let column = suffix_ratios(profile.layers(), rock, omega);
        if column
            .iter()
            .any(|(uu, inc)| !uu.is_finite() || !inc.is_finite())
        {
            return Err(TransferError::NonFinite { index, frequency });
        }
        columns.push(column);
    }
    Ok(assemble(profile, grid, columns))
}

/// Like [`depth_transfer_set`] with the frequency loop run on rayon.
///
/// Frequencies are independent, so the result matches the serial version
/// exactly. Enable with the `parallel` feature.
#[cfg(feature = "parallel")]
pub fn depth_transfer_set_parallel(
    profile: &SoilProfile,
    rock: &RockHalfspace,
    grid: &FrequencyGrid,
) -> Result<DepthTransferSet, TransferError> {
    let columns: Result<Vec<_>, TransferError> = grid
        .frequencies()
        .par_iter()
        .enumerate()
        .map(|(index, &frequency)| {
            let omega = 2.0 * PI * frequency;
            let column = suffix_ratios(profile.layers(), rock, omega);
            if column
                .iter()
                .any(|(uu, inc)| !uu.is_finite() || !inc.is_finite())
            {
                Err(TransferError::NonFinite { index, frequency })
            } else {
                Ok(column)
            }
        })
        .collect();
    Ok(assemble(profile, grid, columns?))
}

/// Convolve a bedrock record through every transfer function of `set`.
///
/// The result is one acceleration history per start depth, ordered surface
/// first, each aligned to the input's time axis. A DRM writer pairs these
/// with a `data_location` index per extraction point (see
/// [`point_depth_indices`](super::point_depth_indices)).
///
/// # Errors
/// [`ConvolveError`] from the first depth whose convolution produces a
/// non-finite sample.
pub fn depth_motions(
    set: &DepthTransferSet,
    bedrock: &TimeHistory,
) -> Result<Vec<DepthMotion>, ConvolveError> {
    set.start_depths
        .iter()
        .zip(&set.transfers)
        .map(|(&start_depth, transfer)| {
            let motion = convolve_surface_motion(transfer, bedrock)?;
            Ok(DepthMotion {
                start_depth,
                motion,
            })
        })
        .collect()
}
