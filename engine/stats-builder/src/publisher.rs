//! Writes JSON outputs for the static site and the processed-data folder

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::links::Link;
use crate::schedule::ScheduleEntry;
use crate::stats::PlayerSummary;
use crate::team::{TeamPlayerRow, TeamRecords};

/// Cross-game player summary
pub const PLAYER_SUMMARY_FILE: &str = "player_summary.json";

/// Build metadata read by the site's "last updated" banner
pub const METADATA_FILE: &str = "last_updated.json";

/// Metadata about one build run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetadata {
    pub generated_at: DateTime<Utc>,
    pub games_processed: Vec<u64>,
    pub players_tracked: usize,
    pub team_records: Option<TeamRecords>,
}

/// Everything the site reads, produced by one build
#[derive(Debug, Clone)]
pub struct SiteData {
    pub summary: PlayerSummary,
    pub metadata: BuildMetadata,
    pub team_players: Vec<TeamPlayerRow>,
    pub schedule: Vec<ScheduleEntry>,
    pub links: Vec<Link>,
}

/// Serialize `value` with 2-space indentation into `path`, creating parent directories
pub fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| BuildError::io(path, e))?;
    debug!("Wrote {:?}", path);
    Ok(())
}

/// Publishes site data into the directory served by the static page
#[derive(Debug, Clone)]
pub struct SitePublisher {
    site_dir: PathBuf,
    slug: String,
}

impl SitePublisher {
    pub fn new(site_dir: impl Into<PathBuf>, slug: impl Into<String>) -> Self {
        Self { site_dir: site_dir.into(), slug: slug.into() }
    }

    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    pub fn team_players_path(&self) -> PathBuf {
        self.site_dir.join(format!("{}_players.json", self.slug))
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.site_dir.join(format!("{}_schedule.json", self.slug))
    }

    pub fn links_path(&self) -> PathBuf {
        self.site_dir.join(format!("{}_links.json", self.slug))
    }

    /// Write every site file, returning the paths written
    pub fn publish(&self, data: &SiteData) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.site_dir).map_err(|e| BuildError::io(&self.site_dir, e))?;

        let summary_path = self.site_dir.join(PLAYER_SUMMARY_FILE);
        write_pretty_json(&summary_path, &data.summary)?;

        let metadata_path = self.site_dir.join(METADATA_FILE);
        write_pretty_json(&metadata_path, &data.metadata)?;

        let players_path = self.team_players_path();
        write_pretty_json(&players_path, &data.team_players)?;

        let schedule_path = self.schedule_path();
        write_pretty_json(&schedule_path, &data.schedule)?;

        let links_path = self.links_path();
        write_pretty_json(&links_path, &data.links)?;

        Ok(vec![summary_path, metadata_path, players_path, schedule_path, links_path])
    }
}
