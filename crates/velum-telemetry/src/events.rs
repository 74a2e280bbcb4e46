//! Simulation event types.
//!
//! Structured events emitted by the run loop around each timestep. Events
//! are plain values that carry just enough data for monitoring and
//! post-mortem inspection of a run.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the run loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Timestep number. Events before the first step use 0.
    pub timestep: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Timestep started.
    TimestepBegin {
        /// Simulated time before the step (seconds).
        sim_time: f64,
    },

    /// Timestep completed.
    TimestepEnd {
        /// Wall-clock time of the step (seconds).
        wall_time: f64,
        /// Unbroken springs after the step.
        active_springs: usize,
    },

    /// A spring broke during the step.
    SpringFractured {
        /// Index of the spring in the mesh.
        spring: usize,
        /// First endpoint `[i, j]`.
        a: [u32; 2],
        /// Second endpoint `[i, j]`.
        b: [u32; 2],
        /// Damage at the time of fracture.
        damage: f32,
    },

    /// Energy snapshot of the current state.
    Energy {
        /// Kinetic energy (0.5 * m * v^2).
        kinetic: f64,
        /// Elastic energy stored in intact springs.
        elastic: f64,
    },

    /// Points whose normal could not be estimated; drag was skipped there.
    DegenerateNormals {
        /// Number of affected points.
        count: usize,
    },

    /// A frame was handed to the exporter.
    FrameExported {
        /// Exporter name.
        exporter: String,
        /// Frames written so far.
        frame: usize,
    },

    /// Exporting a frame failed; the run continues.
    ExportSkipped {
        /// Error description.
        reason: String,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given timestep.
    pub fn new(timestep: u64, kind: EventKind) -> Self {
        Self { timestep, kind }
    }

    /// Short tag of the event kind.
    pub fn label(&self) -> &'static str {
        match self.kind {
            EventKind::TimestepBegin { .. } => "timestep_begin",
            EventKind::TimestepEnd { .. } => "timestep_end",
            EventKind::SpringFractured { .. } => "spring_fractured",
            EventKind::Energy { .. } => "energy",
            EventKind::DegenerateNormals { .. } => "degenerate_normals",
            EventKind::FrameExported { .. } => "frame_exported",
            EventKind::ExportSkipped { .. } => "export_skipped",
        }
    }
}
