//! Force engine.
//!
//! Two passes fill a per-point acceleration buffer:
//!
//! 1. **Spring pass.** Springs are split into one contiguous chunk per
//!    worker. Each worker owns its chunk (so damage updates need no
//!    synchronisation) and accumulates into a private buffer. Buffers are
//!    merged into the shared one under a lock, and the same lock guards the
//!    fracture transition and the active-spring counter.
//! 2. **Point pass.** Each point adds gravity, viscous damping, fluid drag
//!    and the variant's auxiliary force to its own slot.
//!
//! Fixed points receive nothing from either pass.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rayon::prelude::*;
use velum_math::{direction_and_length, Vec3};
use velum_mesh::normals::point_normal;
use velum_mesh::{Grid, Spring};
use velum_types::{GridPoint, Scalar};

use crate::boundary::BoundaryPolicy;
use crate::fracture::FractureCriteria;

/// Elastic response of one spring in the current configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringResponse {
    /// Force on endpoint `a`. Endpoint `b` receives the negation.
    pub force: Vec3,
    /// Current length.
    pub length: Scalar,
    /// Rest length.
    pub rest_length: Scalar,
}

impl SpringResponse {
    /// Relative elongation `(length - rest) / rest`.
    #[inline]
    pub fn strain(&self) -> Scalar {
        (self.length - self.rest_length) / self.rest_length
    }

    /// Elastic energy `0.5 k (length - rest)^2`.
    #[inline]
    pub fn energy(&self, stiffness: Scalar) -> Scalar {
        let stretch = self.length - self.rest_length;
        0.5 * stiffness * stretch * stretch
    }
}

/// Hookean force of `spring`, directed along `P[a] - P[b]`.
///
/// Coincident endpoints give a zero direction and therefore zero force.
pub fn spring_force(spring: &Spring, positions: &Grid<Vec3>, rest: &Grid<Vec3>) -> SpringResponse {
    let (direction, length) = direction_and_length(spring.extent(positions));
    let rest_length = spring.rest_length(rest);
    let magnitude = -spring.stiffness() * (length - rest_length);
    SpringResponse {
        force: direction * magnitude,
        length,
        rest_length,
    }
}

/// Inputs shared by every worker of the spring pass.
pub struct SpringPass<'a> {
    pub positions: &'a Grid<Vec3>,
    pub rest: &'a Grid<Vec3>,
    pub fixed: &'a [bool],
    pub inv_mass: Scalar,
    pub dt: Scalar,
    pub criteria: FractureCriteria,
}

/// Shared targets of the spring pass, all guarded by one lock.
struct Reduction<'a> {
    accelerations: &'a mut [Vec3],
    active_springs: &'a mut usize,
    fractured: &'a mut Vec<usize>,
}

fn lock<'m, 'a>(m: &'m Mutex<Reduction<'a>>) -> MutexGuard<'m, Reduction<'a>> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Number of springs handed to each worker.
pub fn chunk_len(spring_count: usize, workers: usize) -> usize {
    spring_count.div_ceil(workers.max(1)).max(1)
}

/// Runs the spring pass.
///
/// `scratch` holds one private buffer per chunk of `chunk_len` springs,
/// each as long as `accelerations`. Indices of springs that fractured this
/// pass are appended to `fractured`.
pub fn accumulate_spring_forces(
    pass: &SpringPass<'_>,
    springs: &mut [Spring],
    chunk_len: usize,
    scratch: &mut [Vec<Vec3>],
    accelerations: &mut [Vec3],
    active_springs: &mut usize,
    fractured: &mut Vec<usize>,
) {
    let cols = pass.positions.cols();
    let shared = Mutex::new(Reduction {
        accelerations,
        active_springs,
        fractured,
    });

    springs
        .par_chunks_mut(chunk_len)
        .zip(scratch.par_iter_mut())
        .enumerate()
        .for_each(|(worker, (chunk, local))| {
            local.fill(Vec3::ZERO);
            let offset = worker * chunk_len;

            for (k, spring) in chunk.iter_mut().enumerate() {
                if spring.is_broken() {
                    continue;
                }
                let response = spring_force(spring, pass.positions, pass.rest);
                let a = spring.a().index(cols);
                let b = spring.b().index(cols);
                let delta = response.force * pass.inv_mass;
                if !pass.fixed[a] {
                    local[a] += delta;
                }
                if !pass.fixed[b] {
                    local[b] -= delta;
                }

                let energy = response.energy(spring.stiffness());
                if pass.criteria.assess(spring, response.strain(), energy, pass.dt) {
                    let mut guard = lock(&shared);
                    if spring.fracture() {
                        *guard.active_springs -= 1;
                        guard.fractured.push(offset + k);
                        tracing::info!(
                            spring = offset + k,
                            a = %spring.a(),
                            b = %spring.b(),
                            energy,
                            damage = spring.damage(),
                            "spring fractured"
                        );
                    }
                }
            }

            let mut guard = lock(&shared);
            for (acc, partial) in guard.accelerations.iter_mut().zip(local.iter()) {
                *acc += *partial;
            }
        });
}

/// Inputs of the point pass.
pub struct PointPass<'a> {
    pub positions: &'a Grid<Vec3>,
    pub velocities: &'a Grid<Vec3>,
    pub fixed: &'a [bool],
    pub boundary: &'a dyn BoundaryPolicy,
    pub inv_mass: Scalar,
    pub gravity: Vec3,
    pub damping: Scalar,
    pub viscosity: Scalar,
    pub fluid_velocity: Vec3,
}

/// Adds the per-point forces to `accelerations`.
///
/// Returns the number of free points whose surface normal was degenerate.
/// Drag needs no normal when the viscosity is zero, so none are counted then.
pub fn accumulate_point_forces(pass: &PointPass<'_>, accelerations: &mut [Vec3]) -> usize {
    let cols = pass.positions.cols();
    let positions = pass.positions.as_slice();
    let velocities = pass.velocities.as_slice();

    accelerations
        .par_iter_mut()
        .enumerate()
        .map(|(k, acc)| {
            if pass.fixed[k] {
                *acc = Vec3::ZERO;
                return 0;
            }
            let p = GridPoint::from_index(k, cols);
            let x = positions[k];
            let v = velocities[k];

            let mut force = pass.gravity - pass.damping * v + pass.boundary.auxiliary_force(p, x);
            let mut degenerate = 0;
            if pass.viscosity != 0.0 {
                match point_normal(pass.positions, p) {
                    Some(n) => force += n * (n.dot(pass.fluid_velocity - v) * pass.viscosity),
                    None => degenerate = 1,
                }
            }

            *acc += force * pass.inv_mass;
            degenerate
        })
        .sum()
}
