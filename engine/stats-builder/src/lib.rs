//! Stats Builder
//!
//! Turns the raw EMP game feeds cached on disk into the JSON files read by the
//! team's static site: a cross-game player summary, build metadata, the team's
//! season player feed, the fixture list and the links list. Every build is a
//! full recomputation from the cache, so running it twice on the same cache
//! produces the same output apart from the timestamp.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stats_builder::{PipelineConfig, StatsBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::with_root("/srv/kog-site");
//!     let outcome = StatsBuilder::new(config)?.run()?;
//!     println!("{} players", outcome.site.summary.len());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config;
pub mod emp;
pub mod error;
pub mod feed;
pub mod links;
pub mod logging;
pub mod publisher;
pub mod schedule;
pub mod stats;
pub mod team;

#[cfg(test)]
mod integration_tests;

pub use builder::{BuildOutcome, StatsBuilder};
pub use config::PipelineConfig;
pub use error::{BuildError, Result};
pub use logging::initialize_logging;
pub use publisher::{BuildMetadata, SiteData, SitePublisher};
pub use stats::PlayerSummary;
