//! # velum-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the velum mass-spring cloth simulator.
//!
//! This crate has zero domain logic; it defines the vocabulary
//! that all other velum crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;
pub mod variant;

pub use error::{VelumError, VelumResult};
pub use ids::GridPoint;
pub use scalar::Scalar;
pub use variant::Variant;
