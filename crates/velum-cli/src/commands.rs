//! CLI command implementations.

use std::path::PathBuf;

use velum_io::{FrameExporter, HeadlessExporter, JsonFrameExporter, MeshSnapshot, VtkSeriesExporter};
use velum_mesh::{number_of_springs, Mesh};
use velum_solver::{create_mesh, SimulationConfig, Solver};
use velum_telemetry::{EventBus, EventKind, TracingSink};
use velum_types::Variant;

use crate::ExportFormat;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Arguments of `velum simulate`.
pub struct SimulateArgs {
    pub variant: Variant,
    pub rows: usize,
    pub cols: usize,
    pub config: Option<PathBuf>,
    pub steps: Option<u32>,
    pub dt: Option<f32>,
    pub every: Option<u32>,
    pub output: PathBuf,
    pub format: ExportFormat,
}

fn load_config(args: &SimulateArgs) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            SimulationConfig::from_toml_str(args.variant, &text)?
        }
        None => SimulationConfig::for_variant(args.variant),
    };
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    if let Some(every) = args.every {
        config.export_every = every;
    }
    config.validate()?;
    Ok(config)
}

fn make_exporter(args: &SimulateArgs) -> std::io::Result<Box<dyn FrameExporter>> {
    let exporter: Box<dyn FrameExporter> = match args.format {
        ExportFormat::Vtk => {
            std::fs::create_dir_all(&args.output)?;
            Box::new(VtkSeriesExporter::new(&args.output, args.variant.name()))
        }
        ExportFormat::Json => {
            std::fs::create_dir_all(&args.output)?;
            let path = args.output.join(format!("{}.json", args.variant.name()));
            Box::new(JsonFrameExporter::new(path))
        }
        ExportFormat::Headless => Box::new(HeadlessExporter::new()),
    };
    Ok(exporter)
}

/// Hands the current state to the exporter. Failures are logged and the
/// run continues.
fn export_frame(exporter: &mut dyn FrameExporter, bus: &EventBus, mesh: &Mesh, config: &SimulationConfig, step: u64) {
    bus.record(
        step,
        EventKind::Energy {
            kinetic: mesh.kinetic_energy(config.point_mass),
            elastic: mesh.elastic_energy(),
        },
    );
    match exporter.submit(&MeshSnapshot::capture(mesh, step)) {
        Ok(()) => bus.record(
            step,
            EventKind::FrameExported {
                exporter: exporter.name().to_string(),
                frame: exporter.frame_count(),
            },
        ),
        Err(e) => {
            tracing::warn!(step, error = %e, "frame export failed, continuing");
            bus.record(step, EventKind::ExportSkipped { reason: e.to_string() });
        }
    }
}

/// Run a simulation.
pub fn simulate(args: &SimulateArgs) -> CliResult {
    let config = load_config(args)?;
    let mut mesh = create_mesh(args.rows, args.cols, args.variant, &config)?;
    let mut solver = Solver::new(&mesh, args.variant, config.clone())?;
    let mut exporter = make_exporter(args)?;

    let mut bus = EventBus::new();
    bus.add_sink(Box::new(TracingSink::new(tracing::Level::DEBUG)));

    println!("velum simulation");
    println!("────────────────");
    println!("Variant:   {}", args.variant);
    println!("Grid:      {} x {} ({} springs)", args.rows, args.cols, mesh.spring_count());
    println!("Steps:     {} (dt = {})", config.steps, config.dt);
    println!("Output:    {} ({})", args.output.display(), exporter.name());
    println!();

    export_frame(exporter.as_mut(), &bus, &mesh, &config, 0);
    bus.flush();

    let every = u64::from(config.export_every);
    let steps = u64::from(config.steps);
    let mut wall_time = 0.0;
    let mut fractures = 0usize;

    for step in 1..=steps {
        bus.record(step, EventKind::TimestepBegin { sim_time: f64::from(mesh.time()) });
        let report = solver.step(&mut mesh, config.dt)?;

        for &k in &report.fractured {
            let spring = mesh.springs()[k];
            bus.record(
                step,
                EventKind::SpringFractured {
                    spring: k,
                    a: [spring.a().i, spring.a().j],
                    b: [spring.b().i, spring.b().j],
                    damage: spring.damage(),
                },
            );
        }
        if report.degenerate_normals > 0 {
            bus.record(step, EventKind::DegenerateNormals { count: report.degenerate_normals });
        }
        bus.record(
            step,
            EventKind::TimestepEnd {
                wall_time: report.wall_time,
                active_springs: report.active_springs,
            },
        );

        if step % every == 0 || step == steps {
            export_frame(exporter.as_mut(), &bus, &mesh, &config, step);
        }
        bus.flush();

        fractures += report.fractured.len();
        wall_time += report.wall_time;
    }

    if let Err(e) = exporter.finalize() {
        tracing::warn!(error = %e, "exporter finalize failed");
    }
    bus.finalize();

    println!("Simulated time:  {:.3}s", mesh.time());
    println!("Wall time:       {wall_time:.3}s");
    println!("Fractures:       {fractures}");
    println!("Active springs:  {} / {}", mesh.active_spring_count(), mesh.spring_count());
    println!("Frames written:  {}", exporter.frame_count());
    Ok(())
}

/// Print the closed-form spring counts.
pub fn springs(rows: usize, cols: usize) -> CliResult {
    if rows == 0 || cols == 0 {
        return Err(format!("grid must be at least 1 x 1, got {rows} x {cols}").into());
    }
    let count = number_of_springs(rows, cols);
    println!("Grid:        {rows} x {cols}");
    println!("Structural:  {}", count.structural);
    println!("Shear:       {}", count.shear);
    println!("Flexion:     {}", count.flexion);
    println!("Total:       {}", count.total());
    Ok(())
}

/// Print the effective configuration of a variant.
pub fn config(variant: Variant) -> CliResult {
    let config = SimulationConfig::for_variant(variant);
    println!("# velum configuration for the {variant} variant");
    print!("{}", config.to_toml_string()?);
    Ok(())
}
