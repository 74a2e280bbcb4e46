//! Configuration variants.
//!
//! A variant selects the embedding plane, the fixed-point predicate,
//! auxiliary body forces and the per-variant tunable overrides. The set is
//! closed: every dispatch over it is an exhaustive `match`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VelumError;

/// Which sheet configuration to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Vertical sheet hanging from its two top corners.
    Curtain,
    /// Horizontal sheet held by a central disc of anchored points.
    TableCloth,
    /// Destructible sheet pinned along its bottom band and pulled apart.
    Soft,
    /// Sheet clamped along its first row, exposed to wind.
    Flag,
}

impl Variant {
    /// Returns all variants.
    pub fn all() -> &'static [Variant] {
        &[
            Variant::Curtain,
            Variant::TableCloth,
            Variant::Soft,
            Variant::Flag,
        ]
    }

    /// Returns the command-line / file name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Curtain => "curtain",
            Variant::TableCloth => "table-cloth",
            Variant::Soft => "soft",
            Variant::Flag => "flag",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = VelumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "curtain" => Ok(Variant::Curtain),
            "table-cloth" | "table_cloth" | "table" => Ok(Variant::TableCloth),
            "soft" => Ok(Variant::Soft),
            "flag" => Ok(Variant::Flag),
            other => Err(VelumError::InvalidConfig(format!(
                "Unknown variant '{other}'. Available: curtain, table-cloth, soft, flag"
            ))),
        }
    }
}
