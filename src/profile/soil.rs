//! Soil profile and rock half-space.

use super::{DampingSpec, ProfileError, SoilLayer};

/// Elastic rock half-space beneath the soil column.
///
/// Semi-infinite homogeneous medium; its impedance terminates the
/// transfer-matrix recursion at the base of the last soil layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RockHalfspace {
    /// Shear-wave velocity (m/s), > 0.
    pub vs: f64,
    /// Mass density (kg/m³), > 0.
    pub density: f64,
    /// Damping ratio in [0, 1].
    pub damping: f64,
}

impl RockHalfspace {
    /// Create a validated rock half-space.
    ///
    /// # Errors
    /// Returns a [`ProfileError`] naming the offending field.
    pub fn new(vs: f64, density: f64, damping: f64) -> Result<Self, ProfileError> {
        if vs <= 0.0 || !vs.is_finite() {
            return Err(ProfileError::NonPositiveVelocity { value: vs });
        }
        if density <= 0.0 || !density.is_finite() {
            return Err(ProfileError::NonPositiveDensity { value: density });
        }
        if !(0.0..=1.0).contains(&damping) {
            return Err(ProfileError::DampingOutOfRange { value: damping });
        }
        Ok(Self {
            vs,
            density,
            damping,
        })
    }

    /// Seismic impedance ρ·vs of the half-space.
    pub fn impedance(&self) -> f64 {
        self.density * self.vs
    }
}

/// Ordered stack of soil layers, surface first.
///
/// The profile is never empty and every layer is validated; these invariants
/// are protected by keeping the layer storage private. Mutating operations
/// re-validate the affected layer before committing, so a failed call leaves
/// the profile untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct SoilProfile {
    layers: Vec<SoilLayer>,
}

impl SoilProfile {
    /// Create a profile from layers ordered top to bottom.
    ///
    /// # Errors
    /// [`ProfileError::EmptyProfile`] for an empty list; field errors from
    /// re-validating each layer.
    pub fn new(layers: Vec<SoilLayer>) -> Result<Self, ProfileError> {
        if layers.is_empty() {
            return Err(ProfileError::EmptyProfile);
        }
        for layer in &layers {
            layer.validate()?;
        }
        Ok(Self { layers })
    }

    /// Single-layer profile.
    pub fn single(layer: SoilLayer) -> Self {
        Self {
            layers: vec![layer],
        }
    }

    /// Assemble without validation; the caller guarantees non-empty,
    /// individually valid layers.
    pub(crate) fn from_validated(layers: Vec<SoilLayer>) -> Self {
        Self { layers }
    }

    /// Layers, surface first.
    pub fn layers(&self) -> &[SoilLayer] {
        &self.layers
    }

    /// Number of layers (always >= 1).
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// A profile is never empty; provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Layer at `index`.
    ///
    /// # Errors
    /// [`ProfileError::LayerIndexOutOfRange`] when `index >= len`.
    pub fn layer(&self, index: usize) -> Result<&SoilLayer, ProfileError> {
        self.layers
            .get(index)
            .ok_or(ProfileError::LayerIndexOutOfRange {
                index,
                len: self.layers.len(),
            })
    }

    /// Total depth of the column: Σ thickness, exactly.
    pub fn total_depth(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }

    /// Cumulative depths of the layer bottoms, surface layer first.
    ///
    /// The last entry equals [`total_depth`](Self::total_depth).
    pub fn interface_depths(&self) -> Vec<f64> {
        let mut depth = 0.0;
        self.layers
            .iter()
            .map(|l| {
                depth += l.thickness;
                depth
            })
            .collect()
    }

    /// Index of the layer containing `depth` (m from the surface).
    ///
    /// Interface depths belong to the layer below them; the bottom of the
    /// column belongs to the last layer. Returns `None` outside [0, total].
    pub fn layer_index_at_depth(&self, depth: f64) -> Option<usize> {
        if depth < 0.0 || depth > self.total_depth() {
            return None;
        }
        let mut bottom = 0.0;
        for (i, layer) in self.layers.iter().enumerate() {
            bottom += layer.thickness;
            if depth < bottom {
                return Some(i);
            }
        }
        Some(self.layers.len() - 1)
    }

    /// Insert a validated layer at `index` (0 = new surface layer,
    /// `len` = new bottom layer).
    pub fn insert_layer(&mut self, index: usize, layer: SoilLayer) -> Result<(), ProfileError> {
        if index > self.layers.len() {
            return Err(ProfileError::LayerIndexOutOfRange {
                index,
                len: self.layers.len(),
            });
        }
        layer.validate()?;
        self.layers.insert(index, layer);
        Ok(())
    }

    /// Append a validated layer at the bottom.
    pub fn push_layer(&mut self, layer: SoilLayer) -> Result<(), ProfileError> {
        layer.validate()?;
        self.layers.push(layer);
        Ok(())
    }

    /// Remove and return the layer at `index`.
    ///
    /// # Errors
    /// [`ProfileError::LastLayer`] when only one layer remains;
    /// [`ProfileError::LayerIndexOutOfRange`] for a bad index.
    pub fn remove_layer(&mut self, index: usize) -> Result<SoilLayer, ProfileError> {
        if index >= self.layers.len() {
            return Err(ProfileError::LayerIndexOutOfRange {
                index,
                len: self.layers.len(),
            });
        }
        if self.layers.len() == 1 {
            return Err(ProfileError::LastLayer);
        }
        Ok(self.layers.remove(index))
    }

    /// Replace the layer at `index` with a validated layer.
    pub fn replace_layer(&mut self, index: usize, layer: SoilLayer) -> Result<(), ProfileError> {
        if index >= self.layers.len() {
            return Err(ProfileError::LayerIndexOutOfRange {
                index,
                len: self.layers.len(),
            });
        }
        layer.validate()?;
        self.layers[index] = layer;
        Ok(())
    }

    /// Sub-profile starting at layer `index` (that layer becomes the new
    /// surface). Used to solve the column "as seen from depth i downward".
    pub fn truncate_from(&self, index: usize) -> Result<SoilProfile, ProfileError> {
        if index >= self.layers.len() {
            return Err(ProfileError::LayerIndexOutOfRange {
                index,
                len: self.layers.len(),
            });
        }
        Ok(SoilProfile {
            layers: self.layers[index..].to_vec(),
        })
    }

    /// Travel-time-averaged shear-wave velocity over the top `depth` m:
    /// `depth / Σ (hᵢ/vsᵢ)` with the last contributing layer taken pro rata.
    ///
    /// Clamps to the column depth when `depth` exceeds it, averaging over
    /// whatever soil exists. A zero or negative `depth` returns the surface
    /// layer's velocity, the limit of the average as the window shrinks.
    pub fn average_vs_over(&self, depth: f64) -> f64 {
        if depth <= 0.0 {
            return self.layers[0].vs;
        }
        let depth = depth.min(self.total_depth());
        let mut remaining = depth;
        let mut travel = 0.0;
        for layer in &self.layers {
            if remaining <= 0.0 {
                break;
            }
            let h = layer.thickness.min(remaining);
            travel += h / layer.vs;
            remaining -= h;
        }
        depth / travel
    }

    /// Time-averaged shear-wave velocity over the top 30 m (the standard
    /// site-classification summary). Averages over the whole column when it
    /// is shallower than 30 m.
    pub fn vs30(&self) -> f64 {
        self.average_vs_over(30.0)
    }
}

/// Partial layer update applied by [`SiteModel::modify_layer`].
///
/// Unset fields keep the layer's current values; the merged layer is
/// validated as a whole before replacing the original, so an invalid update
/// leaves the profile untouched.
///
/// [`SiteModel::modify_layer`]: crate::model::SiteModel::modify_layer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayerUpdate {
    /// New thickness (m), if set.
    pub thickness: Option<f64>,
    /// New shear-wave velocity (m/s), if set.
    pub vs: Option<f64>,
    /// New mass density (kg/m³), if set.
    pub density: Option<f64>,
    /// New damping model, if set.
    pub damping: Option<DampingSpec>,
}

impl LayerUpdate {
    /// Empty update (no fields change).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the thickness.
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Some(thickness);
        self
    }

    /// Set the shear-wave velocity.
    pub fn with_vs(mut self, vs: f64) -> Self {
        self.vs = Some(vs);
        self
    }

    /// Set the density.
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    /// Set the damping model.
    pub fn with_damping(mut self, damping: DampingSpec) -> Self {
        self.damping = Some(damping);
        self
    }

    /// Merge this update onto `layer`, validating the result.
    pub fn apply(&self, layer: &SoilLayer) -> Result<SoilLayer, ProfileError> {
        SoilLayer::new(
            self.thickness.unwrap_or(layer.thickness),
            self.vs.unwrap_or(layer.vs),
            self.density.unwrap_or(layer.density),
            self.damping.unwrap_or(layer.damping),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn layer(h: f64, vs: f64) -> SoilLayer {
        SoilLayer::new(h, vs, 1900.0, DampingSpec::constant(0.05).unwrap()).unwrap()
    }

    fn three_layer_profile() -> SoilProfile {
        SoilProfile::new(vec![layer(2.0, 150.0), layer(6.0, 250.0), layer(10.0, 400.0)]).unwrap()
    }

    #[test]
    fn test_empty_profile_rejected() {
        assert_eq!(
            SoilProfile::new(Vec::new()).unwrap_err(),
            ProfileError::EmptyProfile
        );
    }

    #[test]
    fn test_total_depth_is_sum_of_thickness() {
        let profile = three_layer_profile();
        let expected: f64 = profile.layers().iter().map(|l| l.thickness).sum();
        assert_eq!(profile.total_depth(), expected);
        assert!((profile.total_depth() - 18.0).abs() < TOL);
    }

    #[test]
    fn test_interface_depths() {
        let profile = three_layer_profile();
        let depths = profile.interface_depths();
        assert_eq!(depths.len(), 3);
        assert!((depths[0] - 2.0).abs() < TOL);
        assert!((depths[1] - 8.0).abs() < TOL);
        assert!((depths[2] - 18.0).abs() < TOL);
    }

    #[test]
    fn test_layer_index_at_depth() {
        let profile = three_layer_profile();
        assert_eq!(profile.layer_index_at_depth(0.0), Some(0));
        assert_eq!(profile.layer_index_at_depth(1.9), Some(0));
        // Interfaces belong to the layer below.
        assert_eq!(profile.layer_index_at_depth(2.0), Some(1));
        assert_eq!(profile.layer_index_at_depth(7.5), Some(1));
        assert_eq!(profile.layer_index_at_depth(8.0), Some(2));
        // The column bottom belongs to the last layer.
        assert_eq!(profile.layer_index_at_depth(18.0), Some(2));
        assert_eq!(profile.layer_index_at_depth(18.1), None);
        assert_eq!(profile.layer_index_at_depth(-0.1), None);
    }

    #[test]
    fn test_insert_remove_round_trip() {
        let mut profile = three_layer_profile();
        let depth_before = profile.total_depth();
        let count_before = profile.len();

        profile.insert_layer(1, layer(3.0, 180.0)).unwrap();
        assert_eq!(profile.len(), count_before + 1);
        assert!((profile.total_depth() - depth_before - 3.0).abs() < TOL);

        let removed = profile.remove_layer(1).unwrap();
        assert!((removed.thickness - 3.0).abs() < TOL);
        assert_eq!(profile.len(), count_before);
        assert!((profile.total_depth() - depth_before).abs() < TOL);
    }

    #[test]
    fn test_remove_last_layer_rejected() {
        let mut profile = SoilProfile::single(layer(5.0, 200.0));
        assert_eq!(profile.remove_layer(0).unwrap_err(), ProfileError::LastLayer);
        assert_eq!(profile.len(), 1);
    }

    #[test]
    fn test_index_out_of_range() {
        let mut profile = three_layer_profile();
        assert!(matches!(
            profile.remove_layer(3).unwrap_err(),
            ProfileError::LayerIndexOutOfRange { index: 3, len: 3 }
        ));
        assert!(matches!(
            profile.layer(7).unwrap_err(),
            ProfileError::LayerIndexOutOfRange { index: 7, len: 3 }
        ));
        assert!(profile.insert_layer(4, layer(1.0, 100.0)).is_err());
    }

    #[test]
    fn test_truncate_from() {
        let profile = three_layer_profile();
        let sub = profile.truncate_from(1).unwrap();
        assert_eq!(sub.len(), 2);
        assert!((sub.total_depth() - 16.0).abs() < TOL);
        assert!((sub.layers()[0].vs - 250.0).abs() < TOL);
        assert!(profile.truncate_from(3).is_err());
    }

    #[test]
    fn test_average_vs_harmonic() {
        // Two layers of equal travel time: 10m at 100 m/s and 20m at 200 m/s.
        let profile =
            SoilProfile::new(vec![layer(10.0, 100.0), layer(20.0, 200.0)]).unwrap();
        // Travel time = 0.1 + 0.1 = 0.2 s over 30 m -> 150 m/s.
        assert!((profile.vs30() - 150.0).abs() < 1e-9);

        // Partial last layer: top 15 m = 10m @ 100 + 5m @ 200.
        let avg = profile.average_vs_over(15.0);
        assert!((avg - 15.0 / (0.1 + 0.025)).abs() < 1e-9);
    }

    #[test]
    fn test_average_vs_degenerate_window() {
        let profile =
            SoilProfile::new(vec![layer(10.0, 100.0), layer(20.0, 200.0)]).unwrap();
        // Shrinking window tends to the surface layer's velocity; zero and
        // negative windows take that limit instead of dividing by zero.
        let zero = profile.average_vs_over(0.0);
        assert!(zero.is_finite());
        assert!((zero - 100.0).abs() < 1e-12);
        let negative = profile.average_vs_over(-3.0);
        assert!((negative - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_vs30_shallow_column_clamps() {
        let profile = SoilProfile::single(layer(18.0, 200.0));
        assert!((profile.vs30() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_layer_update_merge() {
        let original = layer(5.0, 200.0);
        let update = LayerUpdate::new().with_vs(260.0);
        let merged = update.apply(&original).unwrap();
        assert!((merged.vs - 260.0).abs() < TOL);
        assert!((merged.thickness - 5.0).abs() < TOL);
        assert_eq!(merged.damping, original.damping);

        // Invalid merged layer is rejected and the original is untouched.
        let bad = LayerUpdate::new().with_thickness(-1.0);
        assert!(bad.apply(&original).is_err());
    }

    #[test]
    fn test_rock_validation() {
        assert!(RockHalfspace::new(8000.0, 2000.0, 0.0).is_ok());
        assert!(matches!(
            RockHalfspace::new(0.0, 2000.0, 0.0).unwrap_err(),
            ProfileError::NonPositiveVelocity { .. }
        ));
        assert!(matches!(
            RockHalfspace::new(8000.0, 2000.0, 1.2).unwrap_err(),
            ProfileError::DampingOutOfRange { .. }
        ));
    }
}
