use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use emp_fetcher::{read_sources, FetchCache, HttpFeedClient};
use stats_builder::{initialize_logging, PipelineConfig, StatsBuilder};

/// Fetch every EMP feed listed in the sources file, cache new ones, and rebuild the site data
#[derive(Parser)]
#[command(name = "update-stats")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./stats.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = PipelineConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    let sources_file = config.paths.sources_file();
    let sources = read_sources(&sources_file)?;
    info!("Loaded {} feed sources from {:?}", sources.len(), sources_file);

    let client = HttpFeedClient::new(&config.fetch)?;
    let cache = FetchCache::new(config.paths.raw_dir(), client);
    let report = cache.sync(&sources).await?;

    if report.has_new_feeds() {
        info!("Fetched {} new feeds; regenerating outputs", report.fetched().len());
    } else {
        info!("No new feeds fetched; using cached data");
    }
    if report.failed_count() > 0 {
        error!("{} feeds could not be fetched", report.failed_count());
    }

    info!("Rebuilding processed stats");
    let outcome = StatsBuilder::new(config)?.run().context("Stats build failed")?;

    info!("Done. Wrote {} files", outcome.written.len());
    Ok(())
}
