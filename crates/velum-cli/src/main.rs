//! velum CLI: run cloth simulations and inspect their setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use velum_types::Variant;

mod commands;

#[derive(Parser)]
#[command(name = "velum")]
#[command(version, about = "velum: mass-spring cloth simulation with fracture")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format of the frames written during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One legacy VTK file per frame.
    Vtk,
    /// The whole run in one JSON file.
    Json,
    /// Nothing is written.
    #[value(name = "none")]
    Headless,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation.
    Simulate {
        /// curtain, table-cloth, soft or flag.
        #[arg(long)]
        variant: Variant,

        /// Grid rows (n).
        #[arg(long)]
        rows: usize,

        /// Grid columns (m).
        #[arg(long)]
        cols: usize,

        /// TOML file applied on top of the variant defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of steps (overrides the config).
        #[arg(long)]
        steps: Option<u32>,

        /// Timestep in seconds (overrides the config).
        #[arg(long)]
        dt: Option<f32>,

        /// Export a frame every N steps (overrides the config).
        #[arg(long)]
        every: Option<u32>,

        /// Output directory, created if missing.
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Frame format.
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Vtk)]
        format: ExportFormat,
    },

    /// Print the spring count breakdown of an n × m grid.
    Springs {
        #[arg(long)]
        rows: usize,
        #[arg(long)]
        cols: usize,
    },

    /// Print the effective configuration of a variant as TOML.
    Config {
        #[arg(long)]
        variant: Variant,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Simulate {
            variant,
            rows,
            cols,
            config,
            steps,
            dt,
            every,
            output,
            format,
        } => commands::simulate(&commands::SimulateArgs {
            variant,
            rows,
            cols,
            config,
            steps,
            dt,
            every,
            output,
            format,
        }),
        Commands::Springs { rows, cols } => commands::springs(rows, cols),
        Commands::Config { variant } => commands::config(variant),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
