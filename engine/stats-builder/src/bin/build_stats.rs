use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use stats_builder::{initialize_logging, PipelineConfig, StatsBuilder};

/// Rebuild processed stats and site data from the cached EMP feeds
#[derive(Parser)]
#[command(name = "build-stats")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./stats.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = PipelineConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    info!("Rebuilding processed stats from {:?}", config.paths.raw_dir());

    let outcome = StatsBuilder::new(config)?.run().context("Stats build failed")?;

    info!("Done. Wrote {} files", outcome.written.len());
    Ok(())
}
