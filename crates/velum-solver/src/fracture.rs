//! Fracture criteria.
//!
//! A spring accumulates damage from tensile strain over time and breaks
//! when either its elastic energy or its accumulated damage passes a
//! threshold. Both checks are optional.

use velum_mesh::Spring;
use velum_types::Scalar;

use crate::config::SimulationConfig;

/// Thresholds that decide when a spring breaks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FractureCriteria {
    /// Elastic energy limit.
    pub energy: Option<Scalar>,
    /// Accumulated damage limit.
    pub damage: Option<Scalar>,
}

impl FractureCriteria {
    /// Criteria that never break anything.
    pub const NEVER: Self = Self {
        energy: None,
        damage: None,
    };

    /// Reads the thresholds from a config.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            energy: config.energy_threshold,
            damage: config.damage_threshold,
        }
    }

    /// True if no threshold is set.
    pub fn is_disabled(&self) -> bool {
        self.energy.is_none() && self.damage.is_none()
    }

    /// True if either threshold is strictly exceeded.
    pub fn exceeded(&self, energy: Scalar, damage: Scalar) -> bool {
        self.energy.is_some_and(|limit| energy > limit) || self.damage.is_some_and(|limit| damage > limit)
    }

    /// Accumulates this step's damage on `spring` and reports whether it
    /// should now break.
    ///
    /// Only tensile strain damages a spring, so damage never decreases.
    /// Broken springs are left untouched and never reported again.
    pub fn assess(&self, spring: &mut Spring, strain: Scalar, energy: Scalar, dt: Scalar) -> bool {
        if spring.is_broken() {
            return false;
        }
        spring.accumulate_damage(strain.max(0.0) * dt);
        self.exceeded(energy, spring.damage())
    }
}
