//! # velum-math
//!
//! Vector primitives for the velum simulator.
//!
//! Provides:
//! - Re-export of `glam::Vec3` as the canonical 3D vector (dot, length,
//!   add, scale, cross all come from `glam`)
//! - Guarded helpers the force engine relies on: zero-safe normalization,
//!   spring direction/length split, collinearity test

pub mod vector;

// Re-export glam types as the canonical math types for velum.
pub use glam::Vec3;

pub use vector::{direction_and_length, is_collinear, normalize_or_self};
