//! # velum-mesh
//!
//! Grid storage and spring topology for a mass-spring sheet.
//!
//! ## Key Types
//!
//! - [`Mesh`]: The data store: positions, velocities, rest positions and
//!   springs over an `n × m` grid, held in flat row-major buffers.
//! - [`Spring`]: Two endpoints, a stiffness and a one-way fracture state.
//! - [`topology`]: Closed-form spring counts, forward-only generation and
//!   the per-point stencil query.
//! - [`generators`]: Embedding of the grid into a coordinate plane.

pub mod generators;
pub mod grid;
pub mod mesh;
pub mod normals;
pub mod spring;
pub mod topology;

pub use generators::Plane;
pub use grid::Grid;
pub use mesh::{Mesh, MeshStateMut};
pub use spring::{Spring, SpringKind, Stiffness};
pub use topology::{number_of_springs, possible_springs, SpringCount, Stencil};
