//! Depth reconciliation and depth-indexed solutions for DRM seeding.
//!
//! Domain-reduction analyses need the free-field solution at every mesh
//! depth inside the model box, not only at the ground surface. This module
//! aligns a soil profile with depths extracted from a 3-D mesh
//! ([`refine_profile`]), solves one transfer function per resulting
//! sub-layer ([`depth_transfer_set`]), and convolves a bedrock record into
//! a motion per depth ([`depth_motions`]).

mod depth_series;
mod extraction;
mod resample;

pub use depth_series::{depth_motions, depth_transfer_set, DepthMotion, DepthTransferSet};
#[cfg(feature = "parallel")]
pub use depth_series::depth_transfer_set_parallel;
pub use extraction::{
    depths_from_z, point_depth_indices, unique_descending_z, ClipShape, ExtractionSource,
    SyntheticGrid,
};
pub use resample::refine_profile;

use thiserror::Error;

/// Tolerance (m) for matching mesh-extracted depths against profile depths.
pub const DEPTH_TOLERANCE: f64 = 1e-2;

/// Errors from depth reconciliation.
#[derive(Debug, Error, PartialEq)]
pub enum ResampleError {
    /// No extracted depths were supplied.
    #[error("no extracted depths")]
    EmptyDepths,

    /// An extracted depth is non-finite or above the ground surface.
    #[error("invalid extracted depth {value} at index {index}")]
    InvalidDepth {
        /// Index into the extracted depth list.
        index: usize,
        /// Offending depth (m).
        value: f64,
    },

    /// Deepest extracted depth does not reach the bottom of the profile.
    #[error(
        "mesh depth {extracted} m does not match profile depth {profile} m \
         within {tolerance} m"
    )]
    DepthMismatch {
        /// Deepest extracted depth (m).
        extracted: f64,
        /// Profile total depth (m).
        profile: f64,
        /// Matching tolerance (m).
        tolerance: f64,
    },

    /// An extraction point's depth matches no entry of the depth grid.
    #[error("extraction point {index} lies off the depth grid")]
    PointOffDepthGrid {
        /// Index into the extraction point list.
        index: usize,
    },
}
