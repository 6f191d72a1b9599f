//! MarsBase Headless Simulation Runner
//!
//! Loads a scenario and a facility layout, runs the habitat until the mission
//! is decided (or the step limit is hit) and optionally exports the metrics.
//!
//! Usage:
//!   cargo run -p marsbase-sim -- --config config/params.json --grid config/grid_layout.csv
//!   RUST_LOG=debug cargo run -p marsbase-sim -- --seed 42 --max-steps 200

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use marsbase_core::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// MarsBase - Mars habitat crisis simulation
#[derive(Parser, Debug)]
#[command(name = "marsbase-sim")]
#[command(about = "Run a Mars habitat crisis scenario to its verdict")]
struct Args {
    /// Scenario parameters (JSON)
    #[arg(long, default_value = "config/params.json")]
    config: PathBuf,

    /// Facility layout (semicolon-delimited grid)
    #[arg(long, default_value = "config/grid_layout.csv")]
    grid: PathBuf,

    /// Random seed, overrides SEED from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Step limit, overrides MAX_STEPS from the config
    #[arg(long)]
    max_steps: Option<u64>,

    /// Write the per-tick metrics table here as JSON
    #[arg(long)]
    metrics_out: Option<PathBuf>,

    /// Print a progress line every N steps (0 disables)
    #[arg(long, default_value_t = 10)]
    report_every: u64,
}

/// `RUST_LOG` directives when present and valid, `info` otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    let args = Args::parse();

    let mut config = SimConfig::load(&args.config)
        .with_context(|| format!("loading scenario {}", args.config.display()))?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.max_steps.is_some() {
        config.max_steps = args.max_steps;
    }

    let layout = GridLayout::load(&args.grid)
        .with_context(|| format!("loading layout {}", args.grid.display()))?;
    let mut engine =
        SimulationEngine::build(&layout, &config).context("building the facility")?;

    println!("=== MarsBase Simulation ===");
    println!(
        "seed {} | {}x{} grid | {} crew | {} robots",
        engine.seed(),
        engine.facility.width(),
        engine.facility.height(),
        engine.human_count(),
        engine.robot_count(),
    );

    while !engine.mission().is_terminal() {
        if config.max_steps.is_some_and(|max| engine.steps() >= max) {
            info!(steps = engine.steps(), "step limit reached");
            break;
        }
        engine.step();

        if args.report_every > 0 && engine.steps() % args.report_every == 0 {
            if let Some(row) = engine.metrics().last() {
                println!(
                    "step {:>5} | critical {:>2} | atmosphere {:>7.2} | power {:>6.2}",
                    row.step, row.critical_humans, row.atmospheric_condition, row.power_level,
                );
            }
        }
    }

    let status = engine.status();
    println!();
    println!("Mission: {} after {} steps", engine.mission(), engine.steps());
    println!(
        "  survivors {}/{} | power {:.2} | atmosphere {:.2} | comms {}",
        engine.alive_human_count(),
        engine.human_count(),
        status.power_level,
        status.atmospheric_condition,
        if status.communications_online {
            "online"
        } else {
            "offline"
        },
    );

    if let Some(path) = &args.metrics_out {
        let json = engine
            .metrics()
            .to_json()
            .context("serializing metrics")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("  metrics written to {}", path.display());
    }

    Ok(())
}
