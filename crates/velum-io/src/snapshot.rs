//! Read-only view of a mesh for export.
//!
//! A snapshot flattens the grid into indexed geometry: point `(i, j)` has
//! index `i·m + j`, intact springs become line segments and each grid
//! square becomes one quad.

use serde::{Deserialize, Serialize};
use velum_mesh::Mesh;
use velum_types::Scalar;

/// Geometry of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    /// Grid rows (`n`).
    pub rows: usize,
    /// Grid columns (`m`).
    pub cols: usize,
    /// Step the snapshot was taken after.
    pub step: u64,
    /// Simulated time.
    pub time: Scalar,
    /// `n·m` point positions, row-major.
    pub positions: Vec<[f32; 3]>,
    /// Endpoint indices of every unbroken spring.
    pub lines: Vec<[u32; 2]>,
    /// `(n-1)(m-1)` quads `[a, a+m, a+m+1, a+1]`.
    pub cells: Vec<[u32; 4]>,
}

impl MeshSnapshot {
    /// Captures the current state of `mesh`, taken after `step`.
    pub fn capture(mesh: &Mesh, step: u64) -> Self {
        let rows = mesh.rows();
        let cols = mesh.cols();

        let positions = mesh.positions().as_slice().iter().map(|p| p.to_array()).collect();

        let lines = mesh
            .springs()
            .iter()
            .filter(|s| !s.is_broken())
            .map(|s| [s.a().index(cols) as u32, s.b().index(cols) as u32])
            .collect();

        Self {
            rows,
            cols,
            step,
            time: mesh.time(),
            positions,
            lines,
            cells: quad_cells(rows, cols),
        }
    }

    /// Number of points.
    pub fn point_count(&self) -> usize {
        self.positions.len()
    }
}

/// Quads of an `n × m` grid, in row-major order of their lower corner.
pub fn quad_cells(rows: usize, cols: usize) -> Vec<[u32; 4]> {
    let m = cols as u32;
    let mut cells = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1));
    for i in 0..rows.saturating_sub(1) as u32 {
        for j in 0..cols.saturating_sub(1) as u32 {
            let a = i * m + j;
            cells.push([a, a + m, a + m + 1, a + 1]);
        }
    }
    cells
}
