//! # Rover Simulation
//!
//! Free-running multi-task simulation of a differential-drive robot:
//! plant, feedback linearization, proportional controller, per-axis
//! reference models, reference generator and operator UI, each on its own
//! periodic thread, exchanging state through the shared monitor.
//!
//! Writes a per-cycle performance log (jitter and compute time for every
//! task) and the plant trajectory log; `--load` adds CPU load threads so
//! loaded and unloaded jitter can be compared.

use clap::Parser;
use rover_common::config::SimConfig;
use rover_rt::error::HarnessError;
use rover_sim::coordinator::{self, RunOptions};
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// Rover Sim — free-running periodic-task robot simulation
#[derive(Parser, Debug)]
#[command(name = "rover_sim")]
#[command(version)]
#[command(about = "Free-running multi-task real-time robot simulation")]
struct Args {
    /// Path to configuration TOML; built-in defaults apply when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start CPU load generator threads to perturb timing.
    #[arg(long)]
    load: bool,

    /// Override the output directory for CSV logs.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Override the run horizon in seconds.
    #[arg(long, value_name = "SECONDS")]
    horizon: Option<f64>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("rover_sim v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("rover_sim shutdown complete");
}

fn run(args: &Args) -> Result<(), HarnessError> {
    let mut config = SimConfig::load_or_default(args.config.as_deref())?;
    if let Some(ref out_dir) = args.out_dir {
        config.logs.out_dir = out_dir.clone();
    }
    if let Some(horizon) = args.horizon {
        config.run.horizon_s = horizon;
    }
    config.validate()?;

    info!(
        horizon_s = config.run.horizon_s,
        with_load = args.load,
        "config OK"
    );
    coordinator::run(&config, RunOptions {
        with_load: args.load,
    })
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
