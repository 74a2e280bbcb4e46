//! Flat row-major grid storage.
//!
//! One contiguous buffer per field, addressed as `i * cols + j`. This keeps
//! the per-point passes cache friendly and lets them run as plain parallel
//! slice iterations.

use std::ops::{Index, IndexMut};

use velum_types::GridPoint;

/// A `rows × cols` grid of values stored in a single contiguous buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn new(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    /// Creates a grid by evaluating `f` at each point, in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(GridPoint) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(GridPoint::new(i as u32, j as u32)));
            }
        }
        Self { rows, cols, data }
    }

    /// Number of rows (`n`).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`m`).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the grid holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the cell at `p`, or `None` if `p` is out of bounds.
    #[inline]
    pub fn get(&self, p: GridPoint) -> Option<&T> {
        if p.in_bounds(self.rows, self.cols) {
            self.data.get(p.index(self.cols))
        } else {
            None
        }
    }

    /// Row-major view of all cells.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major view of all cells.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over `(point, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, &T)> {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(k, v)| (GridPoint::from_index(k, cols), v))
    }
}

impl<T> Index<GridPoint> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, p: GridPoint) -> &T {
        debug_assert!(p.in_bounds(self.rows, self.cols), "{p} out of bounds");
        &self.data[p.index(self.cols)]
    }
}

impl<T> IndexMut<GridPoint> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, p: GridPoint) -> &mut T {
        debug_assert!(p.in_bounds(self.rows, self.cols), "{p} out of bounds");
        &mut self.data[p.index(self.cols)]
    }
}
