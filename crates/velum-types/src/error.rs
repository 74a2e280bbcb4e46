//! Error types for the velum simulator.
//!
//! All crates return `VelumResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the velum simulator.
#[derive(Debug, Error)]
pub enum VelumError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A simulation invariant was violated (e.g., spring count mismatch).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for `Result<T, VelumError>`.
pub type VelumResult<T> = Result<T, VelumError>;
