//! Pluggable event sinks.
//!
//! Sinks consume events from the bus and process them (collect in memory,
//! forward to the log, etc.).

use std::sync::{Arc, Mutex, PoisonError};

use crate::events::{EventKind, SimulationEvent};

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Shared handle to the events collected by a [`VecSink`].
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl EventLog {
    /// Copy of every event collected so far.
    pub fn snapshot(&self) -> Vec<SimulationEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of events collected so far.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, event: SimulationEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

/// A sink that keeps every event in memory.
///
/// The sink itself is moved into the bus; read the events back through
/// the [`EventLog`] returned by [`VecSink::log`].
#[derive(Debug, Default)]
pub struct VecSink {
    log: EventLog,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the collected events, valid after the sink is boxed.
    pub fn log(&self) -> EventLog {
        self.log.clone()
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        self.log.push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that forwards events to `tracing`.
///
/// Fractures and export failures are always logged at `INFO`/`WARN`.
/// Routine per-step events go out at the configured level.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    /// Creates a new tracing sink for routine events at `level`.
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }

    fn routine(&self, event: &SimulationEvent) {
        let step = event.timestep;
        let kind = &event.kind;
        if self.level == tracing::Level::ERROR {
            tracing::error!(timestep = step, event = ?kind, "simulation_event");
        } else if self.level == tracing::Level::WARN {
            tracing::warn!(timestep = step, event = ?kind, "simulation_event");
        } else if self.level == tracing::Level::INFO {
            tracing::info!(timestep = step, event = ?kind, "simulation_event");
        } else if self.level == tracing::Level::DEBUG {
            tracing::debug!(timestep = step, event = ?kind, "simulation_event");
        } else {
            tracing::trace!(timestep = step, event = ?kind, "simulation_event");
        }
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        match &event.kind {
            EventKind::SpringFractured { spring, a, b, damage } => {
                tracing::info!(
                    timestep = event.timestep,
                    spring,
                    a = ?a,
                    b = ?b,
                    damage,
                    "spring_fractured"
                );
            }
            EventKind::ExportSkipped { reason } => {
                tracing::warn!(timestep = event.timestep, %reason, "export_skipped");
            }
            _ => self.routine(event),
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
