//! # velum-io
//!
//! Export of simulation frames for visualization.
//!
//! The solver never touches the filesystem. The run loop captures a
//! [`MeshSnapshot`] every few steps and hands it to a [`FrameExporter`].

pub mod exporter;
pub mod json_exporter;
pub mod snapshot;
pub mod vtk;

pub use exporter::{FrameExporter, HeadlessExporter, VtkSeriesExporter};
pub use json_exporter::JsonFrameExporter;
pub use snapshot::{quad_cells, MeshSnapshot};
pub use vtk::{write_vtk, write_vtk_to};
