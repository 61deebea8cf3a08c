//! Reel Outcome Simulator
//!
//! Usage:
//!   reel-sim                           - Reference configuration, 10M trials
//!   reel-sim --config game.yaml        - Load a JSON/YAML configuration
//!   reel-sim --trials 1000 --seed 42   - Override trial count and seed
//!   reel-sim --format json             - Print the full report as JSON

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use rf_reel_sim::{SimulationConfig, run_simulation};

#[derive(Parser)]
#[command(name = "reel-sim", about = "Reel outcome frequency simulator")]
struct Cli {
    /// Configuration file (.json, .yaml, .yml); reference preset if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override trial count
    #[arg(short, long)]
    trials: Option<u64>,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker shard count
    #[arg(long)]
    shards: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::reference(),
    };
    if let Some(trials) = cli.trials {
        config = config.with_trials(trials);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(shards) = cli.shards {
        config = config.with_shards(shards);
    }

    log::info!("Running {} trials", config.trials);
    let report = run_simulation(config).context("simulation failed")?;

    match cli.format {
        Format::Table => print!("{}", output::render_table(&report)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
