//! The simulation step.

use std::time::Instant;

use rayon::prelude::*;
use velum_math::Vec3;
use velum_mesh::Mesh;
use velum_types::{GridPoint, Scalar, Variant, VelumError, VelumResult};

use crate::boundary::{boundary_for, plane_for, BoundaryPolicy};
use crate::config::SimulationConfig;
use crate::forces::{self, PointPass, SpringPass};
use crate::fracture::FractureCriteria;
use crate::integrator;

/// Result of one solver step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Step counter, starting at 1 for the first step.
    pub step: u64,
    /// Simulated time after the step.
    pub time: Scalar,
    /// Indices of springs that fractured during the step.
    pub fractured: Vec<usize>,
    /// Free points whose surface normal could not be estimated.
    pub degenerate_normals: usize,
    /// Unbroken springs after the step.
    pub active_springs: usize,
    /// Wall-clock time of the step (seconds).
    pub wall_time: f64,
}

/// Builds a mesh laid out the way `variant` expects.
pub fn create_mesh(rows: usize, cols: usize, variant: Variant, config: &SimulationConfig) -> VelumResult<Mesh> {
    config.validate()?;
    Mesh::new(rows, cols, plane_for(variant), config.spacing, &config.stiffness)
}

/// Explicit mass-spring solver bound to one mesh shape and one variant.
///
/// All scratch buffers are allocated once in [`Solver::new`]; a step
/// allocates nothing unless springs fracture.
///
/// ```text
/// let mut mesh = create_mesh(n, m, variant, &config)?;
/// let mut solver = Solver::new(&mesh, variant, config)?;
/// loop {
///     solver.step(&mut mesh, dt)?;
/// }
/// ```
pub struct Solver {
    variant: Variant,
    config: SimulationConfig,
    boundary: Box<dyn BoundaryPolicy>,
    criteria: FractureCriteria,
    rows: usize,
    cols: usize,
    spring_count: usize,
    chunk_len: usize,
    fixed: Vec<bool>,
    accelerations: Vec<Vec3>,
    scratch: Vec<Vec<Vec3>>,
    fractured: Vec<usize>,
    steps_taken: u64,
}

impl Solver {
    /// Prepares a solver for `mesh`.
    pub fn new(mesh: &Mesh, variant: Variant, config: SimulationConfig) -> VelumResult<Self> {
        config.validate()?;
        mesh.validate()?;

        let points = mesh.point_count();
        let spring_count = mesh.spring_count();
        let workers = rayon::current_num_threads();
        let chunk_len = forces::chunk_len(spring_count, workers);
        let chunks = spring_count.div_ceil(chunk_len);

        let boundary = boundary_for(variant, &config, mesh);
        let criteria = FractureCriteria::from_config(&config);

        tracing::debug!(
            variant = %variant,
            boundary = boundary.name(),
            points,
            springs = spring_count,
            workers,
            chunk_len,
            fracture = !criteria.is_disabled(),
            "solver initialised"
        );

        Ok(Self {
            variant,
            config,
            boundary,
            criteria,
            rows: mesh.rows(),
            cols: mesh.cols(),
            spring_count,
            chunk_len,
            fixed: vec![false; points],
            accelerations: vec![Vec3::ZERO; points],
            scratch: vec![vec![Vec3::ZERO; points]; chunks],
            fractured: Vec::new(),
            steps_taken: 0,
        })
    }

    /// Returns the variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the boundary policy.
    pub fn boundary(&self) -> &dyn BoundaryPolicy {
        self.boundary.as_ref()
    }

    /// Number of steps taken so far.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Accelerations applied during the last step.
    pub fn accelerations(&self) -> &[Vec3] {
        &self.accelerations
    }

    /// Fixed mask used during the last step, row-major.
    pub fn fixed_mask(&self) -> &[bool] {
        &self.fixed
    }

    /// True if `p` is fixed in the current state of `mesh`.
    pub fn is_fixed(&self, mesh: &Mesh, p: GridPoint) -> bool {
        self.boundary.is_fixed(p, mesh.position(p))
    }

    /// Advances `mesh` by `dt`.
    ///
    /// Order: evaluate the fixed set, accumulate spring forces (with damage
    /// and fracture), accumulate point forces, integrate, advance time.
    pub fn step(&mut self, mesh: &mut Mesh, dt: Scalar) -> VelumResult<StepReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(VelumError::InvalidConfig(format!("dt must be positive, got {dt}")));
        }
        if mesh.rows() != self.rows || mesh.cols() != self.cols || mesh.spring_count() != self.spring_count {
            return Err(VelumError::InvalidMesh(format!(
                "solver prepared for {}x{} with {} springs, got {}x{} with {}",
                self.rows,
                self.cols,
                self.spring_count,
                mesh.rows(),
                mesh.cols(),
                mesh.spring_count()
            )));
        }

        let start = Instant::now();
        let inv_mass = 1.0 / self.config.point_mass;
        let cols = self.cols;
        let state = mesh.state_mut();

        // ─── Fixed set ───
        let boundary = self.boundary.as_ref();
        let positions = state.positions.as_slice();
        self.fixed
            .par_iter_mut()
            .enumerate()
            .for_each(|(k, f)| *f = boundary.is_fixed(GridPoint::from_index(k, cols), positions[k]));

        // ─── Forces ───
        self.accelerations.fill(Vec3::ZERO);
        self.fractured.clear();

        let spring_pass = SpringPass {
            positions: state.positions,
            rest: state.rest,
            fixed: &self.fixed,
            inv_mass,
            dt,
            criteria: self.criteria,
        };
        forces::accumulate_spring_forces(
            &spring_pass,
            state.springs,
            self.chunk_len,
            &mut self.scratch,
            &mut self.accelerations,
            state.active_springs,
            &mut self.fractured,
        );

        let point_pass = PointPass {
            positions: state.positions,
            velocities: state.velocities,
            fixed: &self.fixed,
            boundary,
            inv_mass,
            gravity: self.config.gravity_vec(),
            damping: self.config.damping,
            viscosity: self.config.viscosity,
            fluid_velocity: self.config.fluid_vec(),
        };
        let degenerate_normals = forces::accumulate_point_forces(&point_pass, &mut self.accelerations);
        if degenerate_normals > 0 {
            tracing::debug!(count = degenerate_normals, "degenerate normals, drag skipped");
        }

        // ─── Integration ───
        integrator::explicit_euler(
            state.positions.as_mut_slice(),
            state.velocities.as_mut_slice(),
            &self.accelerations,
            &self.fixed,
            dt,
        );
        *state.time += dt;
        self.steps_taken += 1;

        self.fractured.sort_unstable();
        let report = StepReport {
            step: self.steps_taken,
            time: *state.time,
            fractured: self.fractured.clone(),
            degenerate_normals,
            active_springs: *state.active_springs,
            wall_time: start.elapsed().as_secs_f64(),
        };
        tracing::trace!(
            step = report.step,
            time = report.time,
            active = report.active_springs,
            wall_time = report.wall_time,
            "step complete"
        );
        Ok(report)
    }
}
