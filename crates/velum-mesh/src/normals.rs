//! Local surface normal estimation.
//!
//! The normal at a point is taken from the cross product of the directions
//! towards its first and last stencil neighbours. No adjacency index or
//! triangle list is needed.

use velum_math::{is_collinear, normalize_or_self, Vec3};
use velum_types::GridPoint;

use crate::grid::Grid;
use crate::spring::Stiffness;
use crate::topology::{possible_springs, Stencil};

/// Estimates the unit normal at the centre point of `stencil`.
///
/// Returns `None` when the stencil has fewer than two candidates or the two
/// directions are collinear.
pub fn estimate_normal(positions: &Grid<Vec3>, stencil: &Stencil) -> Option<Vec3> {
    if stencil.len() < 2 {
        return None;
    }
    let first = stencil.first()?;
    let last = stencil.last()?;

    let a = positions[first.b()] - positions[first.a()];
    let b = positions[last.b()] - positions[last.a()];
    if is_collinear(a, b) {
        return None;
    }
    Some(normalize_or_self(a.cross(b)))
}

/// Estimates the normal at `p` on an `n × m` position grid.
pub fn point_normal(positions: &Grid<Vec3>, p: GridPoint) -> Option<Vec3> {
    // Stiffness is irrelevant for geometry.
    let stencil = possible_springs(p, positions.rows(), positions.cols(), &Stiffness::uniform(0.0));
    estimate_normal(positions, &stencil)
}
