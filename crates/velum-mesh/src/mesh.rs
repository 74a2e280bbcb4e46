//! Mesh data store.
//!
//! Owns the `n × m` position, velocity and rest-position grids plus the
//! spring list. Rest positions are fixed at construction. Springs are only
//! mutated through their fracture state.

use velum_math::Vec3;
use velum_types::{GridPoint, Scalar, VelumError, VelumResult};

use crate::generators::{flat_sheet, Plane};
use crate::grid::Grid;
use crate::spring::{Spring, Stiffness};
use crate::topology::generate_springs;

/// A mass-spring sheet sampled on an `n × m` grid.
#[derive(Debug, Clone)]
pub struct Mesh {
    rows: usize,
    cols: usize,
    /// Simulated time (seconds).
    time: Scalar,
    positions: Grid<Vec3>,
    velocities: Grid<Vec3>,
    rest: Grid<Vec3>,
    springs: Vec<Spring>,
    active_springs: usize,
}

/// Mutable access to the simulated state of a [`Mesh`].
///
/// Borrowed as a whole so the force engine can read positions and the rest
/// grid while it updates springs. The rest grid stays read-only.
pub struct MeshStateMut<'a> {
    /// Current positions.
    pub positions: &'a mut Grid<Vec3>,
    /// Current velocities.
    pub velocities: &'a mut Grid<Vec3>,
    /// Rest positions.
    pub rest: &'a Grid<Vec3>,
    /// Spring list.
    pub springs: &'a mut [Spring],
    /// Number of intact springs. Must be decremented exactly once per
    /// successful [`Spring::fracture`].
    pub active_springs: &'a mut usize,
    /// Simulated time.
    pub time: &'a mut Scalar,
}

impl Mesh {
    /// Builds a flat sheet at rest in `plane`, with zero velocity and the
    /// full spring topology.
    pub fn new(
        rows: usize,
        cols: usize,
        plane: Plane,
        spacing: Scalar,
        stiffness: &Stiffness,
    ) -> VelumResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(VelumError::InvalidConfig(format!(
                "Mesh dimensions must be >= 1, got {rows}x{cols}"
            )));
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(VelumError::InvalidConfig(format!(
                "Spacing must be positive, got {spacing}"
            )));
        }

        let rest = flat_sheet(rows, cols, spacing, plane);
        let springs = generate_springs(rows, cols, stiffness)?;
        let active_springs = springs.len();

        tracing::debug!(rows, cols, springs = active_springs, ?plane, "mesh created");

        Ok(Self {
            rows,
            cols,
            time: 0.0,
            positions: rest.clone(),
            velocities: Grid::new(rows, cols, Vec3::ZERO),
            rest,
            springs,
            active_springs,
        })
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

    /// Number of grid points, `n · m`.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Simulated time (seconds).
    #[inline]
    pub fn time(&self) -> Scalar {
        self.time
    }

    /// Current positions.
    #[inline]
    pub fn positions(&self) -> &Grid<Vec3> {
        &self.positions
    }

    /// Current velocities.
    #[inline]
    pub fn velocities(&self) -> &Grid<Vec3> {
        &self.velocities
    }

    /// Rest positions.
    #[inline]
    pub fn rest_positions(&self) -> &Grid<Vec3> {
        &self.rest
    }

    /// Current position of `p`.
    #[inline]
    pub fn position(&self, p: GridPoint) -> Vec3 {
        self.positions[p]
    }

    /// Current velocity of `p`.
    #[inline]
    pub fn velocity(&self, p: GridPoint) -> Vec3 {
        self.velocities[p]
    }

    /// All springs, broken ones included, in generation order.
    #[inline]
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Total number of springs, broken ones included.
    #[inline]
    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Number of intact springs.
    #[inline]
    pub fn active_spring_count(&self) -> usize {
        self.active_springs
    }

    /// Centre of the rest configuration.
    pub fn rest_center(&self) -> Vec3 {
        let first = self.rest[GridPoint::new(0, 0)];
        let last = self.rest[GridPoint::new(self.rows as u32 - 1, self.cols as u32 - 1)];
        (first + last) * 0.5
    }

    /// Sets the position of `p`. Intended for initial perturbations.
    pub fn set_position(&mut self, p: GridPoint, position: Vec3) {
        self.positions[p] = position;
    }

    /// Sets the velocity of `p`. Intended for initial conditions.
    pub fn set_velocity(&mut self, p: GridPoint, velocity: Vec3) {
        self.velocities[p] = velocity;
    }

    /// Borrows the mutable simulation state.
    pub fn state_mut(&mut self) -> MeshStateMut<'_> {
        MeshStateMut {
            positions: &mut self.positions,
            velocities: &mut self.velocities,
            rest: &self.rest,
            springs: &mut self.springs,
            active_springs: &mut self.active_springs,
            time: &mut self.time,
        }
    }

    /// Total kinetic energy `Σ 0.5 · mass · |v|²` over all points.
    pub fn kinetic_energy(&self, point_mass: Scalar) -> f64 {
        self.velocities
            .as_slice()
            .iter()
            .map(|v| 0.5 * point_mass as f64 * v.length_squared() as f64)
            .sum()
    }

    /// Elastic energy stored in the intact springs.
    pub fn elastic_energy(&self) -> f64 {
        self.springs
            .iter()
            .filter(|s| !s.is_broken())
            .map(|s| s.potential_energy(&self.positions, &self.rest) as f64)
            .sum()
    }

    /// Checks the structural invariants of the store.
    ///
    /// - all grids are `n × m`
    /// - spring endpoints are distinct and on the grid
    /// - the active count matches the number of intact springs
    pub fn validate(&self) -> VelumResult<()> {
        for (name, grid) in [
            ("positions", &self.positions),
            ("velocities", &self.velocities),
            ("rest", &self.rest),
        ] {
            if grid.rows() != self.rows || grid.cols() != self.cols {
                return Err(VelumError::InvalidMesh(format!(
                    "{name} grid is {}x{}, mesh is {}x{}",
                    grid.rows(),
                    grid.cols(),
                    self.rows,
                    self.cols
                )));
            }
        }

        for (k, s) in self.springs.iter().enumerate() {
            let (a, b) = s.endpoints();
            if a == b {
                return Err(VelumError::InvalidMesh(format!(
                    "Spring {k} has identical endpoints {a}"
                )));
            }
            if !a.in_bounds(self.rows, self.cols) || !b.in_bounds(self.rows, self.cols) {
                return Err(VelumError::InvalidMesh(format!(
                    "Spring {k} endpoints {a}-{b} are out of bounds"
                )));
            }
        }

        let intact = self.springs.iter().filter(|s| !s.is_broken()).count();
        if intact != self.active_springs {
            return Err(VelumError::InvariantViolation(format!(
                "Active spring count is {}, but {intact} springs are intact",
                self.active_springs
            )));
        }

        Ok(())
    }
}
