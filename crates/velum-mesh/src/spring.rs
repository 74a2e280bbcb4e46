//! Springs and their fracture state.
//!
//! A spring joins two distinct grid points. Its rest length is not stored:
//! it is recomputed from the immutable rest-position grid whenever needed.
//!
//! Fracture is one-way. `damage` only grows while the spring is intact, and
//! once [`Spring::fracture`] succeeds there is no way back.

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_types::{GridPoint, Scalar};

use crate::grid::Grid;

/// Spring category, which also fixes the stiffness constant used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpringKind {
    /// Adjacent along `i`: `(i, j)–(i+1, j)`.
    StructuralHorizontal,
    /// Adjacent along `j`: `(i, j)–(i, j+1)`.
    StructuralVertical,
    /// Adjacent along a diagonal.
    Shear,
    /// Skip-one along `i`: `(i, j)–(i+2, j)`.
    FlexionHorizontal,
    /// Skip-one along `j`: `(i, j)–(i, j+2)`.
    FlexionVertical,
}

impl SpringKind {
    /// Axis-aligned, adjacent.
    pub fn is_structural(self) -> bool {
        matches!(self, SpringKind::StructuralHorizontal | SpringKind::StructuralVertical)
    }

    /// Diagonal, adjacent.
    pub fn is_shear(self) -> bool {
        self == SpringKind::Shear
    }

    /// Axis-aligned, skip-one.
    pub fn is_flexion(self) -> bool {
        matches!(self, SpringKind::FlexionHorizontal | SpringKind::FlexionVertical)
    }
}

/// Stiffness constants per direction.
///
/// Horizontal applies to springs along `i` (structural and flexion),
/// vertical to springs along `j`, diagonal to shear springs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stiffness {
    /// Springs along `i`.
    pub horizontal: Scalar,
    /// Springs along `j`.
    pub vertical: Scalar,
    /// Diagonal springs.
    pub diagonal: Scalar,
}

impl Stiffness {
    /// Same constant for every direction.
    pub const fn uniform(k: Scalar) -> Self {
        Self {
            horizontal: k,
            vertical: k,
            diagonal: k,
        }
    }

    /// Stiffness constant for a spring category.
    pub fn for_kind(&self, kind: SpringKind) -> Scalar {
        match kind {
            SpringKind::StructuralHorizontal | SpringKind::FlexionHorizontal => self.horizontal,
            SpringKind::StructuralVertical | SpringKind::FlexionVertical => self.vertical,
            SpringKind::Shear => self.diagonal,
        }
    }
}

impl Default for Stiffness {
    fn default() -> Self {
        Self::uniform(velum_types::constants::DEFAULT_STIFFNESS)
    }
}

/// A spring between grid points `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    a: GridPoint,
    b: GridPoint,
    stiffness: Scalar,
    kind: SpringKind,
    broken: bool,
    damage: Scalar,
}

impl Spring {
    /// Creates an intact, undamaged spring.
    pub fn new(a: GridPoint, b: GridPoint, stiffness: Scalar, kind: SpringKind) -> Self {
        debug_assert_ne!(a, b, "spring endpoints must differ");
        Self {
            a,
            b,
            stiffness,
            kind,
            broken: false,
            damage: 0.0,
        }
    }

    /// First endpoint.
    #[inline]
    pub fn a(&self) -> GridPoint {
        self.a
    }

    /// Second endpoint.
    #[inline]
    pub fn b(&self) -> GridPoint {
        self.b
    }

    /// Both endpoints.
    #[inline]
    pub fn endpoints(&self) -> (GridPoint, GridPoint) {
        (self.a, self.b)
    }

    /// Stiffness constant `k`.
    #[inline]
    pub fn stiffness(&self) -> Scalar {
        self.stiffness
    }

    /// Spring category.
    #[inline]
    pub fn kind(&self) -> SpringKind {
        self.kind
    }

    /// True once the spring has fractured.
    #[inline]
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Accumulated damage.
    #[inline]
    pub fn damage(&self) -> Scalar {
        self.damage
    }

    /// Adds `amount` to the damage of an intact spring.
    ///
    /// Negative amounts and broken springs are ignored, so damage never
    /// decreases.
    #[inline]
    pub fn accumulate_damage(&mut self, amount: Scalar) {
        if !self.broken && amount > 0.0 {
            self.damage += amount;
        }
    }

    /// Marks the spring broken. Returns true only on the transition from
    /// intact to broken.
    #[inline]
    pub fn fracture(&mut self) -> bool {
        if self.broken {
            return false;
        }
        self.broken = true;
        true
    }

    /// Natural length, taken from the rest-position grid.
    #[inline]
    pub fn rest_length(&self, rest: &Grid<Vec3>) -> Scalar {
        (rest[self.a] - rest[self.b]).length()
    }

    /// Vector from `b` to `a` in the given position grid.
    #[inline]
    pub fn extent(&self, positions: &Grid<Vec3>) -> Vec3 {
        positions[self.a] - positions[self.b]
    }

    /// Elastic potential energy `0.5 * k * (len - rest)^2`.
    pub fn potential_energy(&self, positions: &Grid<Vec3>, rest: &Grid<Vec3>) -> Scalar {
        let dx = self.extent(positions).length() - self.rest_length(rest);
        0.5 * self.stiffness * dx * dx
    }
}
