//! Embedding of the point grid into 3D space.
//!
//! The rest configuration of every variant is a flat, evenly spaced sheet
//! lying in one of the coordinate planes.

use serde::{Deserialize, Serialize};
use velum_math::Vec3;
use velum_types::{GridPoint, Scalar};

use crate::grid::Grid;

/// Coordinate plane the sheet is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plane {
    /// `(i, j) -> (i·s, j·s, 0)`: vertical sheet, `j` grows upward.
    Xy,
    /// `(i, j) -> (i·s, 0, j·s)`: horizontal sheet.
    Xz,
}

impl Plane {
    /// Position of grid point `p` for the given spacing.
    #[inline]
    pub fn embed(self, p: GridPoint, spacing: Scalar) -> Vec3 {
        let u = p.i as Scalar * spacing;
        let v = p.j as Scalar * spacing;
        match self {
            Plane::Xy => Vec3::new(u, v, 0.0),
            Plane::Xz => Vec3::new(u, 0.0, v),
        }
    }
}

/// Generates the rest positions of a `rows × cols` sheet.
///
/// # Example
/// ```
/// use velum_mesh::generators::{flat_sheet, Plane};
/// use velum_types::GridPoint;
/// let grid = flat_sheet(3, 2, 0.5, Plane::Xz);
/// assert_eq!(grid.len(), 6);
/// assert_eq!(grid[GridPoint::new(2, 1)].z, 0.5);
/// ```
pub fn flat_sheet(rows: usize, cols: usize, spacing: Scalar, plane: Plane) -> Grid<Vec3> {
    Grid::from_fn(rows, cols, |p| plane.embed(p, spacing))
}
