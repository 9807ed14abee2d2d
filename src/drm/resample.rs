//! Profile refinement against mesh-extracted depths.

use crate::profile::SoilProfile;

use super::{ResampleError, DEPTH_TOLERANCE};

/// Split a profile so that every mesh-extracted depth falls on a layer
/// boundary.
///
/// The extracted depths (measured from the surface, any order) are merged
/// with the profile's own interface depths into one boundary set; each
/// resulting sub-layer inherits the material of whichever original layer
/// contains it. Extracted depths within [`DEPTH_TOLERANCE`] of an original
/// interface are snapped onto it rather than producing a sliver layer, and
/// depths within tolerance of each other collapse to one boundary.
///
/// The refined profile spans the same depth range and, layer splitting
/// aside, describes the same column: solving it yields the same surface
/// transfer function as the original.
///
/// # Errors
/// [`ResampleError::EmptyDepths`] when no depths are given;
/// [`ResampleError::InvalidDepth`] for a non-finite or negative depth;
/// [`ResampleError::DepthMismatch`] when the deepest extracted depth is not
/// within [`DEPTH_TOLERANCE`] of the profile's total depth.
pub fn refine_profile(
    profile: &SoilProfile,
    extracted_depths: &[f64],
) -> Result<SoilProfile, ResampleError> {
    if extracted_depths.is_empty() {
        return Err(ResampleError::EmptyDepths);
    }
    for (index, &value) in extracted_depths.iter().enumerate() {
        if !value.is_finite() || value < -DEPTH_TOLERANCE {
            return Err(ResampleError::InvalidDepth { index, value });
        }
    }

    let total_depth = profile.total_depth();
    let deepest = extracted_depths.iter().fold(f64::MIN, |m, &d| m.max(d));
    if (deepest - total_depth).abs() > DEPTH_TOLERANCE {
        return Err(ResampleError::DepthMismatch {
            extracted: deepest,
            profile: total_depth,
            tolerance: DEPTH_TOLERANCE,
        });
    }

    let interfaces = profile.interface_depths();

    // Snap extracted depths onto nearby original interfaces (or the
    // surface), keeping the interface value so thickness sums are preserved.
    let mut boundaries: Vec<f64> = extracted_depths
        .iter()
        .map(|&depth| {
            interfaces
                .iter()
                .find(|&&d| (depth - d).abs() <= DEPTH_TOLERANCE)
                .copied()
                .unwrap_or(if depth.abs() <= DEPTH_TOLERANCE { 0.0 } else { depth })
        })
        .collect();
    boundaries.extend_from_slice(&interfaces);

    // Sorted, de-duplicated boundary set; entries closer than the tolerance
    // collapse onto the first of them.
    boundaries.sort_by(|a, b| a.total_cmp(b));
    let mut merged: Vec<f64> = Vec::with_capacity(boundaries.len());
    for depth in boundaries {
        if depth <= DEPTH_TOLERANCE {
            continue;
        }
        match merged.last() {
            Some(&last) if (depth - last).abs() <= DEPTH_TOLERANCE => {}
            _ => merged.push(depth),
        }
    }

    // A column no thicker than the tolerance loses every boundary to the
    // surface snap; keep its bottom.
    if merged.is_empty() {
        merged.push(total_depth);
    }

    // Interfaces all sit in `merged`, so each sub-interval lies inside one
    // original layer and its midpoint picks that layer unambiguously.
    let mut layers = Vec::with_capacity(merged.len());
    let mut top = 0.0;
    for &bottom in &merged {
        let midpoint = 0.5 * (top + bottom);
        let index = profile
            .layer_index_at_depth(midpoint)
            .unwrap_or(profile.len() - 1);
        layers.push(profile.layers()[index].with_thickness(bottom - top));
        top = bottom;
    }
    Ok(SoilProfile::from_validated(layers))
}
