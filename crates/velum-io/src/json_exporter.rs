//! JSON frame exporter: the whole run in one file.
//!
//! Captures every submitted frame in memory and serializes the animation
//! on `finalize()`. Springs break during a run, so each frame carries its
//! own line list; the quads never change and are stored once.

use std::path::PathBuf;

use serde::Serialize;
use velum_types::{Scalar, VelumError, VelumResult};

use crate::exporter::FrameExporter;
use crate::snapshot::MeshSnapshot;

/// A single frame of captured mesh data.
#[derive(Serialize)]
struct FrameData {
    step: u64,
    time: Scalar,
    positions: Vec<f32>, // Interleaved [x0,y0,z0, x1,y1,z1, ...]
    lines: Vec<[u32; 2]>,
}

/// Complete animation data for JSON export.
#[derive(Serialize)]
struct AnimationData<'a> {
    rows: usize,
    cols: usize,
    cells: &'a [[u32; 4]],
    frames: &'a [FrameData],
}

/// Exports simulation frames to one JSON file.
///
/// ```text
/// let mut exporter = JsonFrameExporter::new(dir.join("run.json"));
/// // ... call submit() every few steps ...
/// exporter.finalize()?; // Writes the JSON file
/// ```
pub struct JsonFrameExporter {
    output_path: PathBuf,
    rows: usize,
    cols: usize,
    cells: Vec<[u32; 4]>,
    frames: Vec<FrameData>,
}

impl JsonFrameExporter {
    /// Creates a new exporter that will write to the given path.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            rows: 0,
            cols: 0,
            cells: Vec::new(),
            frames: Vec::new(),
        }
    }
}

impl FrameExporter for JsonFrameExporter {
    fn submit(&mut self, snapshot: &MeshSnapshot) -> VelumResult<()> {
        if self.frames.is_empty() {
            self.rows = snapshot.rows;
            self.cols = snapshot.cols;
            self.cells = snapshot.cells.clone();
        } else if (snapshot.rows, snapshot.cols) != (self.rows, self.cols) {
            return Err(VelumError::InvalidMesh(format!(
                "frame is {}x{}, earlier frames are {}x{}",
                snapshot.rows, snapshot.cols, self.rows, self.cols
            )));
        }

        self.frames.push(FrameData {
            step: snapshot.step,
            time: snapshot.time,
            positions: snapshot.positions.iter().flatten().copied().collect(),
            lines: snapshot.lines.clone(),
        });
        Ok(())
    }

    fn finalize(&mut self) -> VelumResult<()> {
        let data = AnimationData {
            rows: self.rows,
            cols: self.cols,
            cells: &self.cells,
            frames: &self.frames,
        };
        let json = serde_json::to_string(&data)
            .map_err(|e| VelumError::Serialization(format!("JSON serialization failed: {e}")))?;
        std::fs::write(&self.output_path, json)?;
        tracing::debug!(path = %self.output_path.display(), frames = self.frames.len(), "json animation written");
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }
}
