use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::emp::{self, EmpFeed, GameMetrics, GameSummary};
use crate::error::{BuildError, Result};
use crate::feed::{self, RawGame};
use crate::links::load_links;
use crate::publisher::{write_pretty_json, BuildMetadata, SiteData, SitePublisher};
use crate::schedule::Schedule;
use crate::stats::PlayerSummary;
use crate::team::{TeamRecords, TeamTotals};

/// What a build produced
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub site: SiteData,
    pub written: Vec<PathBuf>,
}

/// Recomputes every derived output from the raw feed cache
pub struct StatsBuilder {
    config: PipelineConfig,
}

impl StatsBuilder {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run a full build stamped with the current time
    pub fn run(&self) -> Result<BuildOutcome> {
        self.run_at(Utc::now())
    }

    /// Run a full build stamped with `generated_at`
    pub fn run_at(&self, generated_at: DateTime<Utc>) -> Result<BuildOutcome> {
        let paths = &self.config.paths;
        let tracked_team = self.config.team.id;
        let processed_dir = paths.processed_dir();

        let games = feed::load_raw_games(&paths.raw_dir())?;
        info!("Loaded {} cached game feeds", games.len());

        let mut schedule = Schedule::load(&paths.schedule_file(), &self.config.season)?;
        let links = load_links(&paths.links_file())?;

        let mut summary = PlayerSummary::new();
        let mut team_totals = TeamTotals::new(tracked_team);
        let mut game_metrics: Vec<GameMetrics> = Vec::new();
        let mut processed: Vec<u64> = Vec::new();
        let mut written: Vec<PathBuf> = Vec::new();

        for game in &games {
            let feed = match parse_emp_feed(game) {
                Ok(feed) => feed,
                Err(e) => {
                    warn!("Skipping game {}: {}", game.game_id, e);
                    continue;
                }
            };

            let pretty_path = processed_dir.join(format!("game_{}.pretty.json", game.game_id));
            write_pretty_json(&pretty_path, &game.document)?;
            written.push(pretty_path);

            summary.merge(&PlayerSummary::from_player_map(&game.document));

            if let Some(feed) = feed {
                let teams = emp::build_team_structures(&feed);

                let summary_path =
                    processed_dir.join(format!("game_{}_summary.json", game.game_id));
                write_pretty_json(&summary_path, &GameSummary::new(game.game_id, &feed, &teams))?;
                written.push(summary_path);

                team_totals.add_game(&teams);
                summary.merge(&emp::player_contributions(&teams, tracked_team));

                let metrics = emp::compute_game_metrics(&teams, tracked_team, game.game_id);
                if let Some(metrics) = metrics {
                    schedule.apply_metrics(&metrics);
                    game_metrics.push(metrics);
                }
            }

            processed.push(game.game_id);
        }

        let metadata = BuildMetadata {
            generated_at,
            games_processed: processed,
            players_tracked: summary.len(),
            team_records: TeamRecords::from_games(&game_metrics),
        };

        let site = SiteData {
            summary,
            metadata,
            team_players: team_totals.rows(),
            schedule: schedule.into_published(),
            links,
        };

        let publisher = SitePublisher::new(paths.site_dir(), self.config.team.slug.clone());
        written.extend(publisher.publish(&site)?);

        info!(
            "Published stats for {} players from {} games to {:?}",
            site.summary.len(),
            site.metadata.games_processed.len(),
            publisher.site_dir()
        );

        Ok(BuildOutcome { site, written })
    }
}

/// Typed view of an EMP feed, or `None` for documents of another shape
fn parse_emp_feed(game: &RawGame) -> Result<Option<EmpFeed>> {
    if !emp::is_emp_feed(&game.document) {
        return Ok(None);
    }
    EmpFeed::deserialize(&game.document)
        .map(Some)
        .map_err(|e| BuildError::malformed_feed(&game.path, e.to_string()))
}
