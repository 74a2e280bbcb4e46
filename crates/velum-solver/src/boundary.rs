//! Boundary condition policies.
//!
//! One policy per [`Variant`]: which points are externally fixed, and which
//! auxiliary body force acts on the free ones. The mapping from variant to
//! policy is a single exhaustive `match`.

use velum_math::Vec3;
use velum_mesh::{Mesh, Plane};
use velum_types::{GridPoint, Scalar, Variant};

use crate::config::SimulationConfig;

/// Variant-specific boundary behaviour.
pub trait BoundaryPolicy: Send + Sync {
    /// True if `p`, currently at `position`, is held fixed.
    fn is_fixed(&self, p: GridPoint, position: Vec3) -> bool;

    /// Extra body force on a free point.
    fn auxiliary_force(&self, p: GridPoint, position: Vec3) -> Vec3 {
        let _ = (p, position);
        Vec3::ZERO
    }

    /// True if [`BoundaryPolicy::is_fixed`] reads the position, so the
    /// fixed set may change during a run.
    fn depends_on_position(&self) -> bool {
        false
    }

    /// Returns the policy name.
    fn name(&self) -> &str;
}

/// Plane the rest sheet of `variant` is laid out in.
pub fn plane_for(variant: Variant) -> Plane {
    match variant {
        Variant::Curtain | Variant::Soft | Variant::Flag => Plane::Xy,
        Variant::TableCloth => Plane::Xz,
    }
}

/// Builds the boundary policy of `variant` for `mesh`.
pub fn boundary_for(variant: Variant, config: &SimulationConfig, mesh: &Mesh) -> Box<dyn BoundaryPolicy> {
    match variant {
        Variant::Curtain => Box::new(CornerAnchors {
            rows: mesh.rows() as u32,
            cols: mesh.cols() as u32,
        }),
        Variant::TableCloth => Box::new(DiscAnchor {
            center: mesh.rest_center(),
            radius: config.anchor_radius,
        }),
        Variant::Soft => Box::new(TearableSheet {
            pinned_columns: config.pinned_columns,
            coefficient: config.tear_coefficient,
            midline: mesh.rest_center().x,
        }),
        Variant::Flag => Box::new(ClampedEdge),
    }
}

/// Curtain: the two corners of the last column hold the sheet.
#[derive(Debug, Clone, Copy)]
pub struct CornerAnchors {
    rows: u32,
    cols: u32,
}

impl BoundaryPolicy for CornerAnchors {
    fn is_fixed(&self, p: GridPoint, _position: Vec3) -> bool {
        p.j + 1 == self.cols && (p.i == 0 || p.i + 1 == self.rows)
    }

    fn name(&self) -> &str {
        "corner_anchors"
    }
}

/// Table-cloth: every point currently within `radius` of the rest centre.
#[derive(Debug, Clone, Copy)]
pub struct DiscAnchor {
    center: Vec3,
    radius: Scalar,
}

impl BoundaryPolicy for DiscAnchor {
    fn is_fixed(&self, _p: GridPoint, position: Vec3) -> bool {
        position.distance(self.center) <= self.radius
    }

    fn depends_on_position(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "disc_anchor"
    }
}

/// Soft: a bottom band of columns is pinned, and free points are pulled
/// away from the vertical midline in proportion to their offset from it.
#[derive(Debug, Clone, Copy)]
pub struct TearableSheet {
    pinned_columns: u32,
    coefficient: Scalar,
    midline: Scalar,
}

impl BoundaryPolicy for TearableSheet {
    fn is_fixed(&self, p: GridPoint, _position: Vec3) -> bool {
        p.j < self.pinned_columns
    }

    fn auxiliary_force(&self, _p: GridPoint, position: Vec3) -> Vec3 {
        Vec3::X * (self.coefficient * (position.x - self.midline))
    }

    fn name(&self) -> &str {
        "tearable_sheet"
    }
}

/// Flag: the whole first row is clamped to the pole.
#[derive(Debug, Clone, Copy)]
pub struct ClampedEdge;

impl BoundaryPolicy for ClampedEdge {
    fn is_fixed(&self, p: GridPoint, _position: Vec3) -> bool {
        p.i == 0
    }

    fn name(&self) -> &str {
        "clamped_edge"
    }
}
