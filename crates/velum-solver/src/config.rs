//! Simulation configuration.
//!
//! Every tunable of a run lives here. A config is built once (defaults,
//! then per-variant overrides, then file or command-line values), validated,
//! and treated as read-only afterwards.

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_mesh::Stiffness;
use velum_types::constants;
use velum_types::{Scalar, Variant, VelumError, VelumResult};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Distance between neighbouring grid points at rest.
    pub spacing: Scalar,

    /// Stiffness per spring direction.
    pub stiffness: Stiffness,

    /// Mass of every grid point.
    pub point_mass: Scalar,

    /// Viscous damping coefficient: force = -damping * velocity.
    pub damping: Scalar,

    /// Fluid drag coefficient along the local normal.
    pub viscosity: Scalar,

    /// Constant body force applied to every free point [gx, gy, gz].
    pub gravity: [Scalar; 3],

    /// Ambient fluid (wind) velocity [vx, vy, vz].
    pub fluid_velocity: [Scalar; 3],

    /// A spring breaks when its elastic energy exceeds this. `None` disables.
    pub energy_threshold: Option<Scalar>,

    /// A spring breaks when its accumulated damage exceeds this. `None` disables.
    pub damage_threshold: Option<Scalar>,

    /// Radius of the anchored disc (table-cloth).
    pub anchor_radius: Scalar,

    /// Strength of the pull away from the midline (soft).
    pub tear_coefficient: Scalar,

    /// Number of low-`j` columns held fixed (soft).
    pub pinned_columns: u32,

    /// Number of timesteps in a run.
    pub steps: u32,

    /// Timestep (seconds).
    pub dt: Scalar,

    /// Steps between two exported frames.
    pub export_every: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spacing: constants::DEFAULT_SPACING,
            stiffness: Stiffness::default(),
            point_mass: constants::DEFAULT_POINT_MASS,
            damping: constants::DEFAULT_DAMPING,
            viscosity: constants::DEFAULT_VISCOSITY,
            gravity: [0.0, -constants::GRAVITY, 0.0],
            fluid_velocity: [0.0, 0.0, 0.0],
            energy_threshold: None,
            damage_threshold: None,
            anchor_radius: constants::DEFAULT_ANCHOR_RADIUS,
            tear_coefficient: 0.0,
            pinned_columns: 0,
            steps: constants::DEFAULT_STEPS,
            dt: constants::DEFAULT_DT,
            export_every: constants::DEFAULT_EXPORT_EVERY,
        }
    }
}

impl SimulationConfig {
    /// Defaults with the overrides of `variant` applied.
    pub fn for_variant(variant: Variant) -> Self {
        let mut config = Self::default();
        config.apply_variant(variant);
        config
    }

    /// Applies the per-variant overrides in place.
    pub fn apply_variant(&mut self, variant: Variant) {
        match variant {
            Variant::Curtain => {}
            Variant::TableCloth => {
                self.anchor_radius = 2.0 * self.spacing;
            }
            Variant::Soft => {
                self.energy_threshold = Some(2.0);
                self.damage_threshold = Some(0.05);
                self.tear_coefficient = 5.0;
                self.pinned_columns = 1;
            }
            Variant::Flag => {
                self.fluid_velocity = [4.0, 0.0, 1.0];
                self.viscosity = 0.5;
            }
        }
    }

    /// Config with every external force switched off: no gravity, damping,
    /// drag, auxiliary pull or fracture.
    pub fn inert() -> Self {
        Self {
            damping: 0.0,
            viscosity: 0.0,
            gravity: [0.0; 3],
            ..Self::default()
        }
    }

    /// Loads a TOML config file on top of the `variant` defaults.
    ///
    /// Keys absent from the file keep their variant value; nested tables
    /// such as `[stiffness]` are merged key by key.
    pub fn from_toml_str(variant: Variant, text: &str) -> VelumResult<Self> {
        let overlay: toml::Table = text
            .parse()
            .map_err(|e| VelumError::InvalidConfig(format!("config file: {e}")))?;
        let mut base = match toml::Value::try_from(Self::for_variant(variant)) {
            Ok(toml::Value::Table(table)) => table,
            Ok(other) => {
                return Err(VelumError::Serialization(format!(
                    "config serialized to {}, expected a table",
                    other.type_str()
                )))
            }
            Err(e) => return Err(VelumError::Serialization(e.to_string())),
        };
        merge_tables(&mut base, overlay);
        let config: Self = toml::Value::Table(base)
            .try_into()
            .map_err(|e| VelumError::InvalidConfig(format!("config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the config as TOML.
    pub fn to_toml_string(&self) -> VelumResult<String> {
        toml::to_string_pretty(self).map_err(|e| VelumError::Serialization(e.to_string()))
    }

    /// Gravity as a vector.
    #[inline]
    pub fn gravity_vec(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    /// Ambient fluid velocity as a vector.
    #[inline]
    pub fn fluid_vec(&self) -> Vec3 {
        Vec3::from_array(self.fluid_velocity)
    }

    /// Rejects physically meaningless values.
    pub fn validate(&self) -> VelumResult<()> {
        fn positive(name: &str, v: Scalar) -> VelumResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(VelumError::InvalidConfig(format!("{name} must be positive, got {v}")))
            }
        }
        fn non_negative(name: &str, v: Scalar) -> VelumResult<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(VelumError::InvalidConfig(format!("{name} must be non-negative, got {v}")))
            }
        }

        positive("spacing", self.spacing)?;
        positive("point_mass", self.point_mass)?;
        positive("dt", self.dt)?;
        non_negative("stiffness.horizontal", self.stiffness.horizontal)?;
        non_negative("stiffness.vertical", self.stiffness.vertical)?;
        non_negative("stiffness.diagonal", self.stiffness.diagonal)?;
        non_negative("damping", self.damping)?;
        non_negative("viscosity", self.viscosity)?;
        non_negative("anchor_radius", self.anchor_radius)?;

        if !self.tear_coefficient.is_finite() {
            return Err(VelumError::InvalidConfig("tear_coefficient must be finite".into()));
        }
        if self.gravity.iter().chain(&self.fluid_velocity).any(|v| !v.is_finite()) {
            return Err(VelumError::InvalidConfig(
                "gravity and fluid_velocity must be finite".into(),
            ));
        }
        if let Some(e) = self.energy_threshold {
            positive("energy_threshold", e)?;
        }
        if let Some(d) = self.damage_threshold {
            positive("damage_threshold", d)?;
        }
        if self.export_every == 0 {
            return Err(VelumError::InvalidConfig("export_every must be >= 1".into()));
        }
        Ok(())
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}
