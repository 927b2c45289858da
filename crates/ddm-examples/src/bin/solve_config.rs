use anyhow::{Context, Result};
use clap::Parser;
use ddm_core::{solve, SolverConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Solve one JSON model configuration and print its densities")]
struct Args {
    /// Path to a JSON `SolverConfig`.
    config: PathBuf,

    /// Print the full per-step densities rather than the summary.
    #[arg(long)]
    full: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args = Args::parse();
    let path = args.config.to_string_lossy();
    let config = SolverConfig::load_from_file(&path)
        .with_context(|| format!("loading {}", args.config.display()))?;

    tracing::info!(
        drift = config.model.drift.base,
        bound = config.model.bound.dependence.tag(),
        task = config.model.task.tag(),
        "solving"
    );
    let densities = solve(&config)?;

    let json = if args.full {
        serde_json::to_string_pretty(&densities)?
    } else {
        serde_json::to_string_pretty(&densities.summary())?
    };
    println!("{json}");
    Ok(())
}
