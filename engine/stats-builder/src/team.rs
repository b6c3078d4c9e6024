//! Season totals and records for the tracked team

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::emp::{GameMetrics, PlayerGameStats, TeamStats};

/// Running season totals for one player
#[derive(Debug, Clone, Default)]
pub struct PlayerTotals {
    pub name: String,
    pub numbers: BTreeSet<String>,
    pub last_number: String,
    pub games_played: u32,
    pub free_throws: i64,
    pub two_pointers: i64,
    pub three_pointers: i64,
    pub fouls: i64,
}

impl PlayerTotals {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn register_game(
        &mut self,
        number: &str,
        stats: &PlayerGameStats,
        counted_as_played: bool,
    ) {
        let number = number.trim();
        if !number.is_empty() {
            self.numbers.insert(number.to_string());
            self.last_number = number.to_string();
        }

        if counted_as_played {
            self.games_played += 1;
        }

        self.free_throws += stats.one_point_made;
        self.two_pointers += stats.two_point_made;
        self.three_pointers += stats.three_point_made;
        self.fouls += stats.fouls;
    }

    pub fn total_points(&self) -> i64 {
        self.free_throws + self.two_pointers * 2 + self.three_pointers * 3
    }

    /// Shirt number to show: the latest one, else the shortest seen
    pub fn display_number(&self) -> String {
        if !self.last_number.is_empty() {
            return self.last_number.clone();
        }
        self.numbers
            .iter()
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .cloned()
            .unwrap_or_default()
    }

    pub fn points_per_game(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let ppg = self.total_points() as f64 / self.games_played as f64;
        (ppg * 10.0).round_ties_even() / 10.0
    }

    pub fn to_row(&self) -> TeamPlayerRow {
        TeamPlayerRow {
            name: self.name.clone(),
            number: self.display_number(),
            games_played: self.games_played,
            free_throws_made: self.free_throws,
            field_goals_made: self.two_pointers + self.three_pointers,
            three_points_made: self.three_pointers,
            fouls_made: self.fouls,
            total_points: self.total_points(),
            points_per_game: self.points_per_game(),
        }
    }
}

/// One row of the published team player feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPlayerRow {
    pub name: String,
    pub number: String,
    pub games_played: u32,
    pub free_throws_made: i64,
    pub field_goals_made: i64,
    pub three_points_made: i64,
    pub fouls_made: i64,
    pub total_points: i64,
    pub points_per_game: f64,
}

/// Season totals for the tracked team, keyed by player name
#[derive(Debug, Clone, Default)]
pub struct TeamTotals {
    tracked_team_id: i64,
    players: BTreeMap<String, PlayerTotals>,
}

impl TeamTotals {
    pub fn new(tracked_team_id: i64) -> Self {
        Self { tracked_team_id, players: BTreeMap::new() }
    }

    /// Register every player of the tracked team appearing in one game
    pub fn add_game(&mut self, teams: &BTreeMap<i64, TeamStats>) {
        let Some(team) = teams.get(&self.tracked_team_id) else {
            return;
        };

        for player in team.roster.iter().filter(|p| p.is_player()) {
            self.players
                .entry(player.name.clone())
                .or_insert_with(|| PlayerTotals::new(player.name.clone()))
                .register_game(&player.number, &player.stats, player.counted_as_played());
        }
    }

    /// Published rows: players with at least one game, sorted by name
    pub fn rows(&self) -> Vec<TeamPlayerRow> {
        let mut rows: Vec<TeamPlayerRow> = self
            .players
            .values()
            .filter(|p| p.games_played > 0)
            .map(PlayerTotals::to_row)
            .collect();
        rows.sort_by_key(|row| row.name.to_lowercase());
        rows
    }
}

/// Season highlights for the metadata record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecords {
    pub highest_score: GameMetrics,
    pub biggest_win: Option<GameMetrics>,
    pub toughest_loss: Option<GameMetrics>,
}

impl TeamRecords {
    /// Pick the records from a season's games; ties keep the earliest game
    pub fn from_games(games: &[GameMetrics]) -> Option<Self> {
        let highest_score = games
            .iter()
            .reduce(|best, m| if m.team_points > best.team_points { m } else { best })?;

        let biggest_win = games
            .iter()
            .filter(|m| m.point_diff > 0)
            .reduce(|best, m| if m.point_diff > best.point_diff { m } else { best });

        let toughest_loss = games
            .iter()
            .filter(|m| m.point_diff < 0)
            .reduce(|worst, m| if m.point_diff < worst.point_diff { m } else { worst });

        Some(Self {
            highest_score: highest_score.clone(),
            biggest_win: biggest_win.cloned(),
            toughest_loss: toughest_loss.cloned(),
        })
    }
}
