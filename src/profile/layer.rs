//! Soil layer definition and damping models.
//!
//! Each layer carries a damping specification that converts a target
//! critical-damping ratio into an effective ratio at a given angular
//! frequency:
//!
//! - **Constant**: the target ratio applies at every frequency.
//! - **Rayleigh**: classical mass/stiffness-proportional damping
//!   reparameterized to match the target ratio at two corner frequencies
//!   f₁ < f₂:
//!
//! ```text
//! ω₁ = 2πf₁,  ω₂ = 2πf₂
//! a₀ = 2ζ·ω₁ω₂/(ω₁+ω₂)          (mass-proportional coefficient)
//! a₁ = 2ζ/(ω₁+ω₂)               (stiffness-proportional coefficient)
//! ζ(ω) = a₀/(2ω) + a₁·ω/2
//! ```
//!
//! Between the corners the effective ratio dips below the target; outside
//! them it grows, so low- and high-frequency content decays differently than
//! a single constant ratio allows.
//!
//! Damping enters the wave propagation through the viscoelastic correction
//! `c = √(1 + 2iζ(ω))` applied to the layer wavenumber.

use num_complex::Complex64;
use std::f64::consts::PI;

use super::ProfileError;

/// Default lower corner frequency for Rayleigh damping (Hz).
pub const RAYLEIGH_F1_DEFAULT: f64 = 1.0;

/// Default upper corner frequency for Rayleigh damping (Hz).
pub const RAYLEIGH_F2_DEFAULT: f64 = 10.0;

/// Damping model of a soil layer.
///
/// The two variants replace the loosely-keyed damping dictionaries of older
/// site-response tools: the corner frequencies exist only where they mean
/// something, and downstream code matches exhaustively instead of comparing
/// strings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DampingSpec {
    /// Frequency-independent critical-damping ratio.
    Constant {
        /// Damping ratio in [0, 1].
        ratio: f64,
    },
    /// Rayleigh damping matched to `ratio` at corner frequencies `f1 < f2`.
    Rayleigh {
        /// Target damping ratio in [0, 1].
        ratio: f64,
        /// Lower corner frequency (Hz).
        f1: f64,
        /// Upper corner frequency (Hz).
        f2: f64,
    },
}

impl DampingSpec {
    /// Constant damping with the given ratio.
    ///
    /// # Errors
    /// Returns [`ProfileError::DampingOutOfRange`] if `ratio` is outside [0, 1].
    pub fn constant(ratio: f64) -> Result<Self, ProfileError> {
        let spec = Self::Constant { ratio };
        spec.validate()?;
        Ok(spec)
    }

    /// Rayleigh damping matched to `ratio` at `f1` and `f2` (Hz).
    ///
    /// # Errors
    /// Returns a [`ProfileError`] if `ratio` is outside [0, 1], a corner
    /// frequency is non-positive, or `f1 >= f2`.
    pub fn rayleigh(ratio: f64, f1: f64, f2: f64) -> Result<Self, ProfileError> {
        let spec = Self::Rayleigh { ratio, f1, f2 };
        spec.validate()?;
        Ok(spec)
    }

    /// Rayleigh damping with the default corner frequencies (1 Hz and 10 Hz).
    pub fn rayleigh_default(ratio: f64) -> Result<Self, ProfileError> {
        Self::rayleigh(ratio, RAYLEIGH_F1_DEFAULT, RAYLEIGH_F2_DEFAULT)
    }

    /// Check the variant's fields against their physical ranges.
    pub fn validate(&self) -> Result<(), ProfileError> {
        match *self {
            Self::Constant { ratio } => check_ratio(ratio),
            Self::Rayleigh { ratio, f1, f2 } => {
                check_ratio(ratio)?;
                for f in [f1, f2] {
                    if f <= 0.0 {
                        return Err(ProfileError::NonPositiveCornerFrequency { value: f });
                    }
                }
                if f1 >= f2 {
                    return Err(ProfileError::CornerFrequencyOrder { f1, f2 });
                }
                Ok(())
            }
        }
    }

    /// Effective damping ratio at angular frequency `omega` (rad/s).
    ///
    /// Constant damping ignores the frequency. Rayleigh damping evaluates
    /// `a₀/(2ω) + a₁·ω/2` with the coefficients matched to the target ratio
    /// at the two corners; the ratio grows without bound as ω → 0, which is
    /// why frequency grids in this crate never contain ω = 0.
    pub fn ratio_at(&self, omega: f64) -> f64 {
        match *self {
            Self::Constant { ratio } => ratio,
            Self::Rayleigh { ratio, f1, f2 } => {
                let w1 = 2.0 * PI * f1;
                let w2 = 2.0 * PI * f2;
                let a0 = 2.0 * ratio * w1 * w2 / (w1 + w2);
                let a1 = 2.0 * ratio / (w1 + w2);
                a0 / (2.0 * omega) + a1 * omega / 2.0
            }
        }
    }

    /// Viscoelastic wavenumber correction `c = √(1 + 2iζ(ω))`.
    ///
    /// Multiplying the elastic wavenumber `ω/vs` by `c` embeds the material
    /// damping in the propagation phase: the up-going factor `e^{ir}` then
    /// decays with travelled distance instead of oscillating forever.
    pub fn viscoelastic_correction(&self, omega: f64) -> Complex64 {
        let zeta = self.ratio_at(omega);
        Complex64::new(1.0, 2.0 * zeta).sqrt()
    }
}

fn check_ratio(ratio: f64) -> Result<(), ProfileError> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(ProfileError::DampingOutOfRange { value: ratio });
    }
    Ok(())
}

/// One horizontal soil layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoilLayer {
    /// Layer thickness (m), > 0.
    pub thickness: f64,
    /// Shear-wave velocity (m/s), > 0.
    pub vs: f64,
    /// Mass density (kg/m³), > 0.
    pub density: f64,
    /// Damping model.
    pub damping: DampingSpec,
}

impl SoilLayer {
    /// Create a validated layer.
    ///
    /// # Errors
    /// Returns a [`ProfileError`] naming the offending field when `thickness`,
    /// `vs`, or `density` is non-positive, or when the damping specification
    /// is out of range.
    pub fn new(
        thickness: f64,
        vs: f64,
        density: f64,
        damping: DampingSpec,
    ) -> Result<Self, ProfileError> {
        let layer = Self {
            thickness,
            vs,
            density,
            damping,
        };
        layer.validate()?;
        Ok(layer)
    }

    /// Check all fields against their physical ranges.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.thickness <= 0.0 || !self.thickness.is_finite() {
            return Err(ProfileError::NonPositiveThickness {
                value: self.thickness,
            });
        }
        if self.vs <= 0.0 || !self.vs.is_finite() {
            return Err(ProfileError::NonPositiveVelocity { value: self.vs });
        }
        if self.density <= 0.0 || !self.density.is_finite() {
            return Err(ProfileError::NonPositiveDensity { value: self.density });
        }
        self.damping.validate()
    }

    /// Seismic impedance ρ·vs, the quantity whose interface ratios control
    /// reflection and transmission.
    pub fn impedance(&self) -> f64 {
        self.density * self.vs
    }

    /// Vertical shear-wave travel time through the layer (s).
    pub fn travel_time(&self) -> f64 {
        self.thickness / self.vs
    }

    /// Copy of this layer with a different thickness (used when a layer is
    /// split into sub-layers during depth refinement).
    pub fn with_thickness(&self, thickness: f64) -> Self {
        Self { thickness, ..*self }
    }
}
