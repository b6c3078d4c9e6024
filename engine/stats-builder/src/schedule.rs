//! Fixture list for the tracked team
//!
//! The schedule is a hand-maintained CSV with a header row:
//! `matchId,homeOrAway,opponents,location,date,homeScore,awayScore`.
//! Dates look like `Sat 20.Sep 14:00` and carry no year; the year is derived
//! from the season calendar.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset,
    TimeZone, Weekday,
};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::mem::take;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::SeasonConfig;
use crate::emp::GameMetrics;
use crate::error::{BuildError, Result};

/// Minimal CSV parser (quotes + CRLF tolerant)
pub fn parse_csv_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // escaped quote
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    row.push(field);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }

    rows
}

/// Collapse runs of whitespace into single spaces
fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_score(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

/// Resolve a schedule label like `Sat 20.Sep 14:00` to a local tipoff time
pub fn parse_tipoff(raw: &str, season: &SeasonConfig, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let label = normalize_whitespace(raw);
    let (weekday, rest) = label.split_once(' ')?;
    weekday.parse::<Weekday>().ok()?;

    // Parse against a leap year so 29.Feb survives until the real year is known
    let parsed = NaiveDateTime::parse_from_str(&format!("{} 2000", rest), "%d.%b %H:%M %Y").ok()?;

    let year = if parsed.month() < season.start_month {
        season.start_year + 1
    } else {
        season.start_year
    };
    let naive =
        NaiveDate::from_ymd_opt(year, parsed.month(), parsed.day())?.and_time(parsed.time());

    match tz.from_local_datetime(&naive) {
        // Spring-forward gap: keep the wall time with the offset in force before the jump
        LocalResult::None => {
            let before = tz.from_local_datetime(&(naive - Duration::days(1))).earliest()?;
            before.offset().fix().from_local_datetime(&naive).single()
        }
        resolved => resolved.earliest().map(|dt| dt.fixed_offset()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Played,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    pub fn from_point_diff(diff: i64) -> Self {
        match diff {
            d if d > 0 => Self::Win,
            d if d < 0 => Self::Loss,
            _ => Self::Draw,
        }
    }
}

/// One fixture as published to the site
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub match_id: u64,
    pub home_or_away: Venue,
    pub opponent: String,
    pub location: String,
    pub date_label: String,
    pub tipoff: Option<DateTime<FixedOffset>>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub status: GameStatus,
    #[serde(rename = "kogScore")]
    pub team_score: Option<i64>,
    pub opponent_score: Option<i64>,
    pub point_diff: Option<i64>,
    pub result: Option<GameResult>,
    pub has_stats: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_team_id: Option<i64>,
}

impl ScheduleEntry {
    /// Set the tracked team's score line, deriving home/away scores from the venue
    fn set_result(&mut self, team_score: i64, opponent_score: i64) {
        let diff = team_score - opponent_score;
        self.team_score = Some(team_score);
        self.opponent_score = Some(opponent_score);
        self.point_diff = Some(diff);
        self.result = Some(GameResult::from_point_diff(diff));
        self.status = GameStatus::Played;

        let (home, away) = match self.home_or_away {
            Venue::Home => (team_score, opponent_score),
            Venue::Away => (opponent_score, team_score),
        };
        self.home_score = Some(home);
        self.away_score = Some(away);
    }
}

/// The season's fixtures, in file order
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Load the schedule CSV; a missing file is an empty schedule
    pub fn load(path: &Path, season: &SeasonConfig) -> Result<Self> {
        if !path.exists() {
            debug!("No schedule at {:?}", path);
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        Self::parse(&text, season)
    }

    pub fn parse(text: &str, season: &SeasonConfig) -> Result<Self> {
        let tz = season.tz()?;
        let mut rows = parse_csv_rows(text).into_iter();
        let Some(headers) = rows.next() else {
            return Ok(Self::default());
        };
        let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

        let mut schedule = Self::default();
        for row in rows {
            let record: HashMap<&str, &str> =
                headers.iter().map(String::as_str).zip(row.iter().map(String::as_str)).collect();

            let raw_id = record.get("matchId").map(|s| s.trim()).unwrap_or_default();
            if raw_id.is_empty() {
                continue;
            }
            let Ok(match_id) = raw_id.parse::<u64>() else {
                warn!("Skipping schedule row with invalid matchId {:?}", raw_id);
                continue;
            };

            let venue = match record.get("homeOrAway").map(|s| s.trim().to_lowercase()).as_deref() {
                Some("home") => Venue::Home,
                _ => Venue::Away,
            };
            let date_label = normalize_whitespace(record.get("date").copied().unwrap_or_default());

            let mut entry = ScheduleEntry {
                match_id,
                home_or_away: venue,
                opponent: record.get("opponents").map(|s| s.trim()).unwrap_or_default().to_string(),
                location: record.get("location").map(|s| s.trim()).unwrap_or_default().to_string(),
                tipoff: parse_tipoff(&date_label, season, tz),
                date_label,
                home_score: parse_score(record.get("homeScore").copied()),
                away_score: parse_score(record.get("awayScore").copied()),
                status: GameStatus::Upcoming,
                team_score: None,
                opponent_score: None,
                point_diff: None,
                result: None,
                has_stats: false,
                opponent_team_id: None,
            };

            if let (Some(home), Some(away)) = (entry.home_score, entry.away_score) {
                match venue {
                    Venue::Home => entry.set_result(home, away),
                    Venue::Away => entry.set_result(away, home),
                }
            }

            schedule.upsert(entry);
        }

        Ok(schedule)
    }

    /// Insert an entry, replacing an earlier one with the same match id in place
    fn upsert(&mut self, entry: ScheduleEntry) {
        match self.entries.iter_mut().find(|e| e.match_id == entry.match_id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Overlay the computed result of a game with cached stats
    pub fn apply_metrics(&mut self, metrics: &GameMetrics) {
        let Some(entry) = self.entries.iter_mut().find(|e| e.match_id == metrics.game_id) else {
            return;
        };

        entry.set_result(metrics.team_points, metrics.opponent_points);
        entry.has_stats = true;
        entry.opponent_team_id = Some(metrics.opponent_team_id);

        let opponent = metrics.opponent.trim();
        if entry.opponent.is_empty() && !opponent.is_empty() {
            entry.opponent = opponent.to_string();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by tipoff; fixtures without a date go last
    pub fn into_published(self) -> Vec<ScheduleEntry> {
        let mut entries = self.entries;
        entries.sort_by_key(|e| (e.tipoff.is_none(), e.tipoff));
        entries
    }
}
