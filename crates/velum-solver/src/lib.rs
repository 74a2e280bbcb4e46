//! # velum-solver
//!
//! Force evaluation, fracture and time integration for a mass-spring sheet.
//!
//! ## Key Types
//!
//! - [`Solver`]: Owns the scratch buffers and advances a [`velum_mesh::Mesh`]
//!   one explicit step at a time
//! - [`SimulationConfig`]: Every physical and run parameter
//! - [`BoundaryPolicy`]: Per-variant fixed points and auxiliary force
//! - [`FractureCriteria`]: Energy and damage thresholds
//! - [`StepReport`]: What happened during a step

pub mod boundary;
pub mod config;
pub mod forces;
pub mod fracture;
pub mod integrator;
pub mod solver;

pub use boundary::{boundary_for, plane_for, BoundaryPolicy};
pub use config::SimulationConfig;
pub use fracture::FractureCriteria;
pub use solver::{create_mesh, Solver, StepReport};
