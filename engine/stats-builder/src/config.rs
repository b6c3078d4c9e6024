//! Pipeline configuration
//!
//! Every path and tunable used by the fetch and build steps lives here and is
//! passed explicitly into each step. Values come from, in increasing priority:
//! built-in defaults, an optional TOML file, and `STATS__*` environment
//! variables (e.g. `STATS__PATHS__ROOT=/srv/site`).

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};

/// Default config file looked up in the working directory (extension optional)
pub const DEFAULT_CONFIG_NAME: &str = "stats";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "STATS";

/// Configuration shared by the fetcher and the builder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Input, cache and output locations
    pub paths: PathsConfig,

    /// HTTP settings for feed downloads
    pub fetch: FetchConfig,

    /// The team whose season feed is published
    pub team: TeamConfig,

    /// Season calendar used to resolve schedule dates
    pub season: SeasonConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base directory; relative paths below are resolved against it
    pub root: PathBuf,

    /// Newline-delimited list of feed URLs
    pub sources: PathBuf,

    /// Raw feed cache, one `game_<id>.json` per game
    pub raw_dir: PathBuf,

    /// Per-game pretty dumps and summaries
    pub processed_dir: PathBuf,

    /// Directory read by the static site
    pub site_dir: PathBuf,

    /// Optional fixture list (CSV)
    pub schedule: PathBuf,

    /// Optional `label, url` list
    pub links: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    /// EMP `webTeamId` of the tracked team
    pub id: i64,

    /// Prefix for the team's published files (`<slug>_players.json`, ...)
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    /// Calendar year the season starts in
    pub start_year: i32,

    /// Month (1-12) the season starts in; earlier months belong to the next year
    pub start_month: u32,

    /// IANA time zone the schedule is written in
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (compact, pretty, json)
    pub format: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            sources: PathBuf::from("data/sources.txt"),
            raw_dir: PathBuf::from("data/raw"),
            processed_dir: PathBuf::from("data/processed"),
            site_dir: PathBuf::from("docs/data"),
            schedule: PathBuf::from("data/schedule.csv"),
            links: PathBuf::from("data/links.txt"),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "kog-stats-fetcher/1.0".to_string(), timeout_secs: 30 }
    }
}

impl Default for TeamConfig {
    fn default() -> Self {
        // Kungsholmen OG in Profixio
        Self { id: 1403069, slug: "kog".to_string() }
    }
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self { start_year: 2025, start_month: 9, timezone: "Europe/Stockholm".to_string() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

impl PathsConfig {
    /// Resolve `path` against the configured root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn sources_file(&self) -> PathBuf {
        self.resolve(&self.sources)
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.resolve(&self.raw_dir)
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.resolve(&self.processed_dir)
    }

    pub fn site_dir(&self) -> PathBuf {
        self.resolve(&self.site_dir)
    }

    pub fn schedule_file(&self) -> PathBuf {
        self.resolve(&self.schedule)
    }

    pub fn links_file(&self) -> PathBuf {
        self.resolve(&self.links)
    }
}

impl SeasonConfig {
    /// Parse the configured time zone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| {
            BuildError::config(format!("Invalid time zone {:?}: {}", self.timezone, e))
        })
    }
}

impl PipelineConfig {
    /// Default configuration rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.paths.root = root.into();
        config
    }

    /// Load configuration from an optional file and the environment.
    ///
    /// With `path == None` a `stats.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config: PipelineConfig = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(BuildError::config(format!("Invalid log level: {}", other))),
        }

        match self.logging.format.as_str() {
            "compact" | "pretty" | "json" => {}
            other => return Err(BuildError::config(format!("Invalid log format: {}", other))),
        }

        if !(1..=12).contains(&self.season.start_month) {
            return Err(BuildError::config(format!(
                "Invalid season start month: {}",
                self.season.start_month
            )));
        }

        if self.team.slug.trim().is_empty() {
            return Err(BuildError::config("Team slug must not be empty"));
        }

        self.season.tz()?;
        Ok(())
    }
}
