//! Soil column data model.
//!
//! A site is described by an ordered stack of horizontal soil layers over an
//! elastic rock half-space:
//!
//! ```text
//! depth 0 ──────────────────────  ground surface
//!            layer 0  (h₀, vs₀, ρ₀, damping₀)
//!          ──────────────────────
//!            layer 1  (h₁, vs₁, ρ₁, damping₁)
//!          ──────────────────────
//!            ...
//!          ──────────────────────
//!            rock half-space (vs, ρ, damping)   semi-infinite
//! ```
//!
//! Layers are ordered top to bottom; index 0 is the surface layer. All
//! quantities are validated once at construction, so the transfer-matrix
//! solver never re-checks them.

mod layer;
mod soil;

pub use layer::{DampingSpec, SoilLayer, RAYLEIGH_F1_DEFAULT, RAYLEIGH_F2_DEFAULT};
pub use soil::{LayerUpdate, RockHalfspace, SoilProfile};

use thiserror::Error;

/// Error type for soil profile and rock half-space validation.
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    /// A profile must contain at least one layer.
    #[error("soil profile must contain at least one layer")]
    EmptyProfile,

    /// Layer thickness must be strictly positive.
    #[error("layer thickness must be positive, got {value}")]
    NonPositiveThickness { value: f64 },

    /// Shear-wave velocity must be strictly positive.
    #[error("shear-wave velocity must be positive, got {value}")]
    NonPositiveVelocity { value: f64 },

    /// Mass density must be strictly positive.
    #[error("mass density must be positive, got {value}")]
    NonPositiveDensity { value: f64 },

    /// Damping ratio outside the physical range.
    #[error("damping ratio must be within [0, 1], got {value}")]
    DampingOutOfRange { value: f64 },

    /// Rayleigh corner frequencies must be positive.
    #[error("Rayleigh corner frequency must be positive, got {value}")]
    NonPositiveCornerFrequency { value: f64 },

    /// Rayleigh corner frequencies must satisfy f1 < f2.
    #[error("Rayleigh corner frequencies must satisfy f1 < f2, got f1 = {f1}, f2 = {f2}")]
    CornerFrequencyOrder { f1: f64, f2: f64 },

    /// Layer index outside the profile.
    #[error("layer index {index} out of range for profile with {len} layers")]
    LayerIndexOutOfRange { index: usize, len: usize },

    /// The last remaining layer cannot be removed.
    #[error("cannot remove the only layer of a soil profile")]
    LastLayer,
}
