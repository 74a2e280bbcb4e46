//! # velum-telemetry
//!
//! Event bus for simulation telemetry. Emits structured events (timing,
//! energy, fractures, exports) that are consumed by pluggable sinks.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventLog, EventSink, TracingSink, VecSink};
