//! # shake-rs
//!
//! 1-D seismic site response for horizontally layered soil columns over an
//! elastic rock half-space.
//!
//! The crate provides the building blocks of a site-response analysis:
//! - Soil column data model with constant and Rayleigh damping
//! - Transfer-matrix solver over a complex frequency grid
//! - FFT convolution of bedrock records into surface motions
//! - Depth reconciliation against 3-D mesh depths and depth-indexed
//!   transfer functions for Domain Reduction Method (DRM) seeding
//! - A site-model facade tying profile, rock, and grid together
//! - Readers for PEER NGA and two-column ground-motion records
//!
//! # Example
//!
//! ```
//! use shake_rs::{
//!     DampingSpec, FrequencyGrid, RockHalfspace, SiteModel, SoilLayer, SoilProfile,
//! };
//!
//! let damping = DampingSpec::rayleigh(0.03, 2.76, 13.84)?;
//! let profile = SoilProfile::single(SoilLayer::new(18.0, 200.0, 1969.4, damping)?);
//! let rock = RockHalfspace::new(8000.0, 2000.0, 0.0)?;
//!
//! let mut model = SiteModel::new(profile, rock).with_grid(FrequencyGrid::new(22.0, 2000)?);
//! model.compute()?;
//!
//! // Fundamental mode near the quarter-wavelength frequency vs/(4H).
//! let f0 = model.fundamental_frequency()?;
//! assert!((f0 - 200.0 / (4.0 * 18.0)).abs() < 0.3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod drm;
pub mod io;
pub mod model;
pub mod motion;
pub mod profile;
pub mod transfer;

// Re-export main types for convenience
pub use drm::{
    depth_motions, depth_transfer_set, refine_profile, ClipShape, DepthMotion, DepthTransferSet,
    ExtractionSource, ResampleError,
};
#[cfg(feature = "parallel")]
pub use drm::depth_transfer_set_parallel;
pub use io::{read_peer_record, read_two_column_record, MotionFileError};
pub use model::{ModelError, ModelSummary, SiteModel};
pub use motion::{
    convolve_surface_motion, convolve_surface_motion_with_spectra, ConvolveError, TimeHistory,
    TimeHistoryError,
};
pub use profile::{
    DampingSpec, LayerUpdate, ProfileError, RockHalfspace, SoilLayer, SoilProfile,
};
pub use transfer::{solve_transfer, FrequencyGrid, TransferError, TransferFunction};
#[cfg(feature = "parallel")]
pub use transfer::solve_transfer_parallel;
