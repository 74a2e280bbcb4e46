//! Scalar type alias for the simulation.

/// The floating-point type used throughout the simulation.
pub type Scalar = f32;
