//! Site model facade.
//!
//! [`SiteModel`] owns the soil profile, rock half-space, and frequency grid
//! of one site, and caches the solved transfer function as an
//! `Option<TransferFunction>`: every mutator clears it, [`compute`] fills
//! it, and derived queries fail with [`ModelError::NotComputed`] while it is
//! empty. There is no hidden shared state; each model instance is
//! independent and `compute` always produces a fresh result.
//!
//! [`compute`]: SiteModel::compute

use std::fmt;

use thiserror::Error;

use crate::motion::{convolve_surface_motion, ConvolveError, TimeHistory};
use crate::profile::{LayerUpdate, ProfileError, RockHalfspace, SoilLayer, SoilProfile};
use crate::transfer::{solve_transfer, FrequencyGrid, TransferError, TransferFunction};

/// Errors from facade operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Profile or rock validation failed; the model is unchanged.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Frequency grid construction or the solve itself failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Surface-motion convolution failed.
    #[error(transparent)]
    Convolve(#[from] ConvolveError),

    /// A derived query ran before `compute()`, or after a mutation cleared
    /// the cached result.
    #[error("transfer function not computed; call compute() after any model change")]
    NotComputed,
}

/// One site: soil column, rock half-space, frequency grid, and the cached
/// transfer function.
#[derive(Clone, Debug)]
pub struct SiteModel {
    profile: SoilProfile,
    rock: RockHalfspace,
    grid: FrequencyGrid,
    transfer: Option<TransferFunction>,
}

impl SiteModel {
    /// Model with the default frequency grid (2000 points up to 20 Hz).
    pub fn new(profile: SoilProfile, rock: RockHalfspace) -> Self {
        Self {
            profile,
            rock,
            grid: FrequencyGrid::default(),
            transfer: None,
        }
    }

    /// Replace the frequency grid at construction time.
    pub fn with_grid(mut self, grid: FrequencyGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Current soil profile.
    pub fn profile(&self) -> &SoilProfile {
        &self.profile
    }

    /// Current rock half-space.
    pub fn rock(&self) -> &RockHalfspace {
        &self.rock
    }

    /// Current frequency grid.
    pub fn grid(&self) -> &FrequencyGrid {
        &self.grid
    }

    /// Cached transfer function, if `compute` ran since the last mutation.
    pub fn transfer(&self) -> Option<&TransferFunction> {
        self.transfer.as_ref()
    }

    /// Whether a solved transfer function is cached.
    pub fn is_computed(&self) -> bool {
        self.transfer.is_some()
    }

    /// Insert `layer` at `position` (`None` appends at the bottom).
    ///
    /// Clears the cached transfer function.
    pub fn add_layer(
        &mut self,
        layer: SoilLayer,
        position: Option<usize>,
    ) -> Result<(), ModelError> {
        match position {
            Some(index) => self.profile.insert_layer(index, layer)?,
            None => self.profile.push_layer(layer)?,
        }
        self.transfer = None;
        Ok(())
    }

    /// Remove and return the layer at `position`.
    ///
    /// Clears the cached transfer function. Fails on a bad index or when
    /// only one layer remains; the model is then unchanged.
    pub fn remove_layer(&mut self, position: usize) -> Result<SoilLayer, ModelError> {
        let removed = self.profile.remove_layer(position)?;
        self.transfer = None;
        Ok(removed)
    }

    /// Apply a partial update to the layer at `position`.
    ///
    /// The merged layer validates as a whole before replacing the original,
    /// so a failed update leaves the profile untouched. Clears the cached
    /// transfer function.
    pub fn modify_layer(&mut self, position: usize, update: LayerUpdate) -> Result<(), ModelError> {
        let merged = update.apply(self.profile.layer(position)?)?;
        self.profile.replace_layer(position, merged)?;
        self.transfer = None;
        Ok(())
    }

    /// Replace the whole soil profile. Clears the cached transfer function.
    pub fn update_soil_profile(&mut self, profile: SoilProfile) {
        self.profile = profile;
        self.transfer = None;
    }

    /// Replace the rock half-space. Clears the cached transfer function.
    pub fn update_rock(&mut self, rock: RockHalfspace) {
        self.rock = rock;
        self.transfer = None;
    }

    /// Change the grid's upper frequency bound, keeping its point count.
    ///
    /// Clears the cached transfer function.
    pub fn update_frequency(&mut self, f_max: f64) -> Result<(), ModelError> {
        self.grid = self.grid.with_f_max(f_max)?;
        self.transfer = None;
        Ok(())
    }

    /// Solve the transfer function on the current profile, rock, and grid,
    /// cache it, and return it.
    pub fn compute(&mut self) -> Result<&TransferFunction, ModelError> {
        let transfer = solve_transfer(&self.profile, &self.rock, &self.grid)?;
        Ok(self.transfer.insert(transfer))
    }

    /// Frequency (Hz) of the `|TF_uu|` peak.
    ///
    /// # Errors
    /// [`ModelError::NotComputed`] without a cached result.
    pub fn fundamental_frequency(&self) -> Result<f64, ModelError> {
        Ok(self.computed()?.fundamental_frequency())
    }

    /// Peak of `|TF_uu|` over the solved grid.
    ///
    /// # Errors
    /// [`ModelError::NotComputed`] without a cached result.
    pub fn amplification_factor(&self) -> Result<f64, ModelError> {
        Ok(self.computed()?.amplification_factor())
    }

    /// Propagate a bedrock record to the surface through the cached
    /// transfer function.
    ///
    /// # Errors
    /// [`ModelError::NotComputed`] without a cached result; convolution
    /// errors otherwise.
    pub fn compute_surface_motion(&self, bedrock: &TimeHistory) -> Result<TimeHistory, ModelError> {
        Ok(convolve_surface_motion(self.computed()?, bedrock)?)
    }

    /// Total column depth (m).
    pub fn total_depth(&self) -> f64 {
        self.profile.total_depth()
    }

    /// Number of soil layers.
    pub fn layer_count(&self) -> usize {
        self.profile.len()
    }

    /// Summary of the model for display and reports.
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            layer_count: self.profile.len(),
            total_depth: self.profile.total_depth(),
            vs30: self.profile.vs30(),
            rock_vs: self.rock.vs,
            f_max: self.grid.f_max(),
            n_freqs: self.grid.len(),
            computed: self.is_computed(),
        }
    }

    fn computed(&self) -> Result<&TransferFunction, ModelError> {
        self.transfer.as_ref().ok_or(ModelError::NotComputed)
    }
}

/// Snapshot of a model's configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelSummary {
    /// Number of soil layers.
    pub layer_count: usize,
    /// Total column depth (m).
    pub total_depth: f64,
    /// Time-averaged shear-wave velocity over the top 30 m (m/s).
    pub vs30: f64,
    /// Rock shear-wave velocity (m/s).
    pub rock_vs: f64,
    /// Upper frequency bound of the grid (Hz).
    pub f_max: f64,
    /// Number of grid points.
    pub n_freqs: usize,
    /// Whether a solved transfer function is cached.
    pub computed: bool,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Site: {} layer(s), {:.2} m deep, vs30 = {:.1} m/s",
            self.layer_count, self.total_depth, self.vs30
        )?;
        writeln!(f, "Rock: vs = {:.1} m/s", self.rock_vs)?;
        write!(
            f,
            "Grid: {} frequencies up to {:.1} Hz ({})",
            self.n_freqs,
            self.f_max,
            if self.computed { "solved" } else { "not solved" }
        )
    }
}
