//! EMP game feed model
//!
//! An EMP feed describes one game as a `lineup` (every player and official on
//! both teams) plus a play-by-play `events` list. Box-score stats are derived by
//! replaying the scoring and foul events against the lineup.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::stats::{PlayerSummary, StatLine};

/// Made free throw
pub const EVENT_ONE_POINT_MADE: i64 = 106;
/// Made two-point field goal
pub const EVENT_TWO_POINT_MADE: i64 = 104;
/// Made three-point field goal
pub const EVENT_THREE_POINT_MADE: i64 = 103;
/// Personal foul
pub const EVENT_PERSONAL_FOUL: i64 = 109;

/// Largest `goals` value a single scoring event may carry
pub const MAX_EVENT_GOALS: f64 = 1_000.0;

/// Lineup entries of this type are players (as opposed to coaches/staff)
pub const MEMBER_TYPE_PLAYER: &str = "player";

/// Whether a document looks like an EMP feed
pub fn is_emp_feed(document: &Value) -> bool {
    document.get("lineup").is_some() || document.get("events").is_some()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmpFeed {
    pub lineup: Option<Vec<LineupMember>>,
    pub events: Option<Vec<GameEvent>>,
    pub gamestate: Option<GameState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub current_score: Value,
    #[serde(default)]
    pub period: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupMember {
    pub id: Option<i64>,
    pub person_id: Option<i64>,
    pub web_team_id: Option<i64>,
    /// Shirt number; usually a string but some feeds send a bare number
    pub number: Option<Value>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub starter: Option<bool>,
    pub played: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub person: Option<EventPerson>,
    pub event_type_id: Option<i64>,
    pub goals: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPerson {
    pub id: Option<i64>,
}

/// Box-score line for one player in one game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameStats {
    pub points: i64,
    pub one_point_made: i64,
    pub two_point_made: i64,
    pub three_point_made: i64,
    pub fouls: i64,
}

impl PlayerGameStats {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub player_id: Option<i64>,
    pub person_id: Option<i64>,
    pub number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub starter: bool,
    pub played: bool,
    pub stats: PlayerGameStats,
}

impl RosterEntry {
    fn from_member(member: &LineupMember) -> Self {
        let number = match &member.number {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Self {
            player_id: member.id,
            person_id: member.person_id,
            number,
            name: member.name.as_deref().unwrap_or_default().trim().to_string(),
            kind: member.kind.clone(),
            starter: member.starter.unwrap_or(false),
            played: member.played.unwrap_or(false),
            stats: PlayerGameStats::default(),
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind.as_deref() == Some(MEMBER_TYPE_PLAYER)
    }

    /// A player took part if flagged as playing/starting or recorded any stat
    pub fn counted_as_played(&self) -> bool {
        self.played || self.starter || !self.stats.is_empty()
    }
}

/// One team's roster and box score for a game
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub team_id: i64,
    pub team_name: Option<String>,
    pub roster: Vec<RosterEntry>,
    #[serde(skip)]
    index: HashMap<i64, usize>,
}

impl TeamStats {
    fn new(team_id: i64) -> Self {
        Self { team_id, team_name: None, roster: Vec::new(), index: HashMap::new() }
    }

    fn push(&mut self, entry: RosterEntry) {
        if let Some(player_id) = entry.player_id {
            self.index.insert(player_id, self.roster.len());
        }
        self.roster.push(entry);
    }

    fn player_mut(&mut self, player_id: i64) -> Option<&mut RosterEntry> {
        let position = *self.index.get(&player_id)?;
        self.roster.get_mut(position)
    }

    /// Points scored by the team's players
    pub fn points(&self) -> i64 {
        self.roster.iter().filter(|p| p.is_player()).map(|p| p.stats.points).sum()
    }
}

/// Points awarded for a made shot event
fn shot_value(event_type: i64) -> Option<i64> {
    match event_type {
        EVENT_ONE_POINT_MADE => Some(1),
        EVENT_TWO_POINT_MADE => Some(2),
        EVENT_THREE_POINT_MADE => Some(3),
        _ => None,
    }
}

/// Build per-team rosters and box scores from a feed, keyed by team id
pub fn build_team_structures(feed: &EmpFeed) -> BTreeMap<i64, TeamStats> {
    let mut teams: BTreeMap<i64, TeamStats> = BTreeMap::new();

    for member in feed.lineup.iter().flatten() {
        let Some(team_id) = member.web_team_id else {
            continue;
        };
        teams
            .entry(team_id)
            .or_insert_with(|| TeamStats::new(team_id))
            .push(RosterEntry::from_member(member));
    }

    for event in feed.events.iter().flatten() {
        let Some(team_id) = event.team_id else {
            continue;
        };
        let Some(team) = teams.get_mut(&team_id) else {
            continue;
        };

        if team.team_name.is_none() {
            let name = event.team_name.as_deref().unwrap_or_default().trim();
            if !name.is_empty() {
                team.team_name = Some(name.to_string());
            }
        }

        let Some(person_id) = event.person.as_ref().and_then(|p| p.id) else {
            continue;
        };
        let Some(player) = team.player_mut(person_id) else {
            continue;
        };
        let Some(event_type) = event.event_type_id else {
            continue;
        };

        if let Some(value) = shot_value(event_type) {
            let goals = event.goals.unwrap_or(0.0);
            if !goals.is_finite() || goals.abs() > MAX_EVENT_GOALS {
                warn!(
                    "Ignoring scoring event for person {} with implausible goals {}",
                    person_id, goals
                );
            } else if goals != 0.0 {
                let made = (goals / value as f64).floor() as i64;
                if made != 0 {
                    let stats = &mut player.stats;
                    match event_type {
                        EVENT_ONE_POINT_MADE => stats.one_point_made += made,
                        EVENT_TWO_POINT_MADE => stats.two_point_made += made,
                        _ => stats.three_point_made += made,
                    }
                    stats.points += value * made;
                }
            }
        }

        if event_type == EVENT_PERSONAL_FOUL {
            player.stats.fouls += 1;
        }
    }

    teams
}

/// Per-game summary written next to the pretty dump
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub game_id: u64,
    pub final_score: Value,
    pub periods_played: Value,
    pub team_stats: Vec<TeamStats>,
}

impl GameSummary {
    pub fn new(game_id: u64, feed: &EmpFeed, teams: &BTreeMap<i64, TeamStats>) -> Self {
        let state = feed.gamestate.clone().unwrap_or_default();
        Self {
            game_id,
            final_score: state.current_score,
            periods_played: state.period,
            team_stats: teams.values().cloned().collect(),
        }
    }
}

/// Result of one game from the tracked team's point of view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetrics {
    pub game_id: u64,
    pub opponent: String,
    pub opponent_team_id: i64,
    /// Published under the site's historical key
    #[serde(rename = "kogPoints")]
    pub team_points: i64,
    pub opponent_points: i64,
    pub point_diff: i64,
}

/// Score line for the tracked team, if it and an opponent appear in the game
pub fn compute_game_metrics(
    teams: &BTreeMap<i64, TeamStats>,
    tracked_team_id: i64,
    game_id: u64,
) -> Option<GameMetrics> {
    let team = teams.get(&tracked_team_id)?;
    let opponent = teams.values().find(|t| t.team_id != tracked_team_id)?;

    let team_points = team.points();
    let opponent_points = opponent.points();
    let opponent_name = match opponent.team_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Opponent".to_string(),
    };

    Some(GameMetrics {
        game_id,
        opponent: opponent_name,
        opponent_team_id: opponent.team_id,
        team_points,
        opponent_points,
        point_diff: team_points - opponent_points,
    })
}

/// Player summary contributions of the tracked team's players, keyed by name
pub fn player_contributions(
    teams: &BTreeMap<i64, TeamStats>,
    tracked_team_id: i64,
) -> PlayerSummary {
    let mut summary = PlayerSummary::new();
    let Some(team) = teams.get(&tracked_team_id) else {
        return summary;
    };

    for player in team.roster.iter().filter(|p| p.is_player() && p.counted_as_played()) {
        let stats = &player.stats;
        let line: StatLine = [
            ("gamesPlayed", 1),
            ("points", stats.points),
            ("onePointMade", stats.one_point_made),
            ("twoPointMade", stats.two_point_made),
            ("threePointMade", stats.three_point_made),
            ("fouls", stats.fouls),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), Number::from(value)))
        .collect();
        summary.add(&player.name, &line);
    }

    summary
}
