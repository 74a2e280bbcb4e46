//! Legacy ASCII VTK writer.
//!
//! Each snapshot becomes one `POLYDATA` dataset: the points, the intact
//! springs as `LINES` and the grid squares as `POLYGONS`. Files open
//! directly in ParaView or VisIt.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use velum_types::VelumResult;

use crate::snapshot::MeshSnapshot;

/// Writes `snapshot` as a legacy VTK file at `path`.
pub fn write_vtk(snapshot: &MeshSnapshot, path: &Path) -> VelumResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_vtk_to(snapshot, &mut out)?;
    out.flush()?;
    tracing::trace!(path = %path.display(), step = snapshot.step, "vtk frame written");
    Ok(())
}

/// Writes `snapshot` in legacy VTK format to any writer.
pub fn write_vtk_to<W: Write>(snapshot: &MeshSnapshot, out: &mut W) -> VelumResult<()> {
    writeln!(out, "# vtk DataFile Version 3.0")?;
    writeln!(out, "velum step {} time {}", snapshot.step, snapshot.time)?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET POLYDATA")?;

    writeln!(out, "POINTS {} float", snapshot.positions.len())?;
    for [x, y, z] in &snapshot.positions {
        writeln!(out, "{x} {y} {z}")?;
    }

    let lines = snapshot.lines.len();
    writeln!(out, "LINES {} {}", lines, lines * 3)?;
    for [a, b] in &snapshot.lines {
        writeln!(out, "2 {a} {b}")?;
    }

    let cells = snapshot.cells.len();
    writeln!(out, "POLYGONS {} {}", cells, cells * 5)?;
    for [a, b, c, d] in &snapshot.cells {
        writeln!(out, "4 {a} {b} {c} {d}")?;
    }
    Ok(())
}
