//! Grid coordinates.
//!
//! Every simulated point lives on an `n × m` grid. `GridPoint` is the
//! `(i, j)` coordinate; flat buffers address it as `i * m + j`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `(row, column)` coordinate of a point on the simulation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    /// Row index, `0 <= i < n`.
    pub i: u32,
    /// Column index, `0 <= j < m`.
    pub j: u32,
}

impl GridPoint {
    /// Creates a grid point.
    #[inline]
    pub const fn new(i: u32, j: u32) -> Self {
        Self { i, j }
    }

    /// Returns the flat row-major index for a grid with `cols` columns.
    #[inline]
    pub fn index(self, cols: usize) -> usize {
        self.i as usize * cols + self.j as usize
    }

    /// Inverse of [`GridPoint::index`].
    #[inline]
    pub fn from_index(index: usize, cols: usize) -> Self {
        Self {
            i: (index / cols) as u32,
            j: (index % cols) as u32,
        }
    }

    /// Returns true if the point lies on an `rows × cols` grid.
    #[inline]
    pub fn in_bounds(self, rows: usize, cols: usize) -> bool {
        (self.i as usize) < rows && (self.j as usize) < cols
    }

    /// Offsets the point by `(di, dj)`, returning `None` if the result
    /// leaves the `rows × cols` grid.
    pub fn offset(self, di: i64, dj: i64, rows: usize, cols: usize) -> Option<Self> {
        let i = self.i as i64 + di;
        let j = self.j as i64 + dj;
        if i < 0 || j < 0 || i >= rows as i64 || j >= cols as i64 {
            return None;
        }
        Some(Self::new(i as u32, j as u32))
    }
}

impl From<(u32, u32)> for GridPoint {
    fn from((i, j): (u32, u32)) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}
