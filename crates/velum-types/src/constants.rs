//! Physical constants and simulation defaults.

use crate::Scalar;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: Scalar = 9.81;

/// Default spacing between two neighbouring grid points on the same axis.
pub const DEFAULT_SPACING: Scalar = 1.0;

/// Default mass of a single grid point.
pub const DEFAULT_POINT_MASS: Scalar = 1.0;

/// Default viscous damping coefficient (force = -c * v).
pub const DEFAULT_DAMPING: Scalar = 0.9;

/// Default fluid drag coefficient. Zero disables drag.
pub const DEFAULT_VISCOSITY: Scalar = 0.0;

/// Default stiffness for every spring category.
pub const DEFAULT_STIFFNESS: Scalar = 20.0;

/// Default radius of the anchored disc for the table-cloth variant.
pub const DEFAULT_ANCHOR_RADIUS: Scalar = 13.0;

/// Default simulation timestep (seconds).
pub const DEFAULT_DT: Scalar = 0.01;

/// Default number of timesteps in a run.
pub const DEFAULT_STEPS: u32 = 1000;

/// Default number of steps between two exported frames.
pub const DEFAULT_EXPORT_EVERY: u32 = 10;

/// Upper bound on the number of springs incident to a single grid point.
pub const MAX_SPRINGS_PER_POINT: usize = 12;

/// Tolerance on `|dot(a, b)| == 1` when testing unit vectors for collinearity.
pub const COLLINEAR_EPSILON: Scalar = 1.0e-3;

/// Lengths below this are treated as zero.
pub const EPSILON: Scalar = 1.0e-7;
