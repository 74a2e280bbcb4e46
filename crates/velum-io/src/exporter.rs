//! Frame exporter trait, the headless exporter and the VTK series exporter.
//!
//! The run loop hands a snapshot to the exporter every few steps. An
//! exporter error is reported to the caller, which decides whether the
//! run goes on.

use std::path::{Path, PathBuf};

use velum_types::VelumResult;

use crate::snapshot::MeshSnapshot;
use crate::vtk::write_vtk;

/// Trait for simulation output.
///
/// # Implementations
/// - [`HeadlessExporter`]: Discards frames (benchmarks, CI)
/// - [`VtkSeriesExporter`]: One legacy VTK file per frame
/// - [`JsonFrameExporter`](crate::json_exporter::JsonFrameExporter): Whole run in one JSON file
pub trait FrameExporter: Send {
    /// Submit a frame.
    fn submit(&mut self, snapshot: &MeshSnapshot) -> VelumResult<()>;

    /// Finish the output (flush buffers, write pending files).
    fn finalize(&mut self) -> VelumResult<()>;

    /// Returns the exporter name.
    fn name(&self) -> &str;

    /// Returns the number of frames accepted so far.
    fn frame_count(&self) -> usize;
}

/// Headless exporter. Discards all frames.
#[derive(Debug, Default)]
pub struct HeadlessExporter {
    frames: usize,
}

impl HeadlessExporter {
    /// Creates a new headless exporter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameExporter for HeadlessExporter {
    fn submit(&mut self, _snapshot: &MeshSnapshot) -> VelumResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn finalize(&mut self) -> VelumResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "headless"
    }

    fn frame_count(&self) -> usize {
        self.frames
    }
}

/// Writes each frame to `<dir>/<prefix>_<step>.vtk`.
///
/// The directory must exist; creating it is the caller's job.
#[derive(Debug)]
pub struct VtkSeriesExporter {
    dir: PathBuf,
    prefix: String,
    frames: usize,
}

impl VtkSeriesExporter {
    /// Creates an exporter writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            frames: 0,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file written for `step`.
    pub fn frame_path(&self, step: u64) -> PathBuf {
        self.dir.join(format!("{}_{}.vtk", self.prefix, step))
    }
}

impl FrameExporter for VtkSeriesExporter {
    fn submit(&mut self, snapshot: &MeshSnapshot) -> VelumResult<()> {
        write_vtk(snapshot, &self.frame_path(snapshot.step))?;
        self.frames += 1;
        Ok(())
    }

    fn finalize(&mut self) -> VelumResult<()> {
        tracing::debug!(dir = %self.dir.display(), frames = self.frames, "vtk series complete");
        Ok(())
    }

    fn name(&self) -> &str {
        "vtk"
    }

    fn frame_count(&self) -> usize {
        self.frames
    }
}
