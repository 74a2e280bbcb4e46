//! Semi-implicit (symplectic) Euler integration.

use rayon::prelude::*;
use velum_math::Vec3;
use velum_types::Scalar;

/// Advances every free point by `dt`: velocity first, then position from
/// the updated velocity. Fixed points keep both position and velocity.
///
/// All slices are indexed by the row-major point index and must have the
/// same length.
pub fn explicit_euler(
    positions: &mut [Vec3],
    velocities: &mut [Vec3],
    accelerations: &[Vec3],
    fixed: &[bool],
    dt: Scalar,
) {
    debug_assert_eq!(positions.len(), velocities.len());
    debug_assert_eq!(positions.len(), accelerations.len());
    debug_assert_eq!(positions.len(), fixed.len());

    positions
        .par_iter_mut()
        .zip(velocities.par_iter_mut())
        .zip(accelerations.par_iter())
        .zip(fixed.par_iter())
        .for_each(|(((x, v), a), &is_fixed)| {
            if is_fixed {
                return;
            }
            *v += *a * dt;
            *x += *v * dt;
        });
}
