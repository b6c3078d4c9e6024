//! End-to-end builds over a temporary site layout

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::emp::tests::{sample_feed, AWAY, HOME};
use crate::error::BuildError;
use crate::publisher::{METADATA_FILE, PLAYER_SUMMARY_FILE};
use crate::{PipelineConfig, StatsBuilder};

fn site_with_raw_dir() -> (TempDir, PipelineConfig) {
    let temp_dir = TempDir::new().unwrap();
    let config = PipelineConfig::with_root(temp_dir.path());
    fs::create_dir_all(config.paths.raw_dir()).unwrap();
    (temp_dir, config)
}

fn write_raw(config: &PipelineConfig, game_id: u64, document: &Value) {
    let path = config.paths.raw_dir().join(format!("game_{}.json", game_id));
    fs::write(path, serde_json::to_string(document).unwrap()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_empty_cache_publishes_empty_summary() {
    let (_temp_dir, config) = site_with_raw_dir();
    let site_dir = config.paths.site_dir();

    let outcome = StatsBuilder::new(config).unwrap().run().unwrap();
    assert!(outcome.site.summary.is_empty());

    assert_eq!(read_json(&site_dir.join(PLAYER_SUMMARY_FILE)), json!({}));
    let metadata = read_json(&site_dir.join(METADATA_FILE));
    assert!(metadata["generatedAt"].as_str().unwrap().len() > 10);
    assert_eq!(metadata["gamesProcessed"], json!([]));
}

#[test]
fn test_missing_raw_dir_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let builder = StatsBuilder::new(PipelineConfig::with_root(temp_dir.path())).unwrap();
    assert!(matches!(builder.run(), Err(BuildError::MissingRawDir(_))));
}

#[test]
fn test_player_map_feeds_are_summed() {
    let (_temp_dir, config) = site_with_raw_dir();
    write_raw(&config, 1, &json!({"players": {"A": {"goals": 2}}}));
    write_raw(&config, 2, &json!({"players": {"A": {"goals": 1}, "B": {"goals": 3}}}));
    let paths = config.paths.clone();

    StatsBuilder::new(config).unwrap().run().unwrap();

    assert_eq!(
        read_json(&paths.site_dir().join(PLAYER_SUMMARY_FILE)),
        json!({"A": {"goals": 3}, "B": {"goals": 3}})
    );
    assert_eq!(read_json(&paths.site_dir().join(METADATA_FILE))["gamesProcessed"], json!([1, 2]));

    let pretty = fs::read_to_string(paths.processed_dir().join("game_2.pretty.json")).unwrap();
    assert!(pretty.contains("\n  \"players\": {"));
    assert!(!paths.processed_dir().join("game_2_summary.json").exists());
}

#[test]
fn test_rebuild_is_byte_identical() {
    let (_temp_dir, config) = site_with_raw_dir();
    write_raw(
        &config,
        1,
        &json!({"players": {"Z": {"goals": 1, "assists": 2}, "A": {"goals": 2}}}),
    );
    write_raw(&config, 7, &sample_feed());
    let paths = config.paths.clone();
    let site_files =
        ["player_summary.json", "last_updated.json", "kog_players.json", "kog_schedule.json"];
    let builder = StatsBuilder::new(config).unwrap();
    let stamp = Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();

    builder.run_at(stamp).unwrap();
    let first: Vec<String> = site_files
        .iter()
        .map(|f| fs::read_to_string(paths.site_dir().join(f)).unwrap())
        .collect();

    builder.run_at(stamp).unwrap();
    let second: Vec<String> = site_files
        .iter()
        .map(|f| fs::read_to_string(paths.site_dir().join(f)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_emp_feed_builds_team_outputs() {
    let (_temp_dir, config) = site_with_raw_dir();
    write_raw(&config, 7, &sample_feed());
    fs::write(
        config.paths.schedule_file(),
        "matchId,homeOrAway,opponents,location,date,homeScore,awayScore\n\
         7,home,,Hall A,Sat 20.Sep 14:00,,\n\
         8,away,Tigers,Hall B,Sat 27.Sep 14:00,,\n",
    )
    .unwrap();
    fs::write(config.paths.links_file(), "Table, https://example.org/table\n").unwrap();
    let paths = config.paths.clone();

    let outcome = StatsBuilder::new(config).unwrap().run().unwrap();

    let summary = read_json(&paths.site_dir().join(PLAYER_SUMMARY_FILE));
    assert_eq!(summary["Anna"]["points"], 3);
    assert_eq!(summary["Bea"]["fouls"], 1);
    assert_eq!(summary["Bea"]["gamesPlayed"], 1);
    assert!(summary.get("Dana").is_none());

    let players = read_json(&paths.site_dir().join("kog_players.json"));
    assert_eq!(players.as_array().unwrap().len(), 2);
    assert_eq!(players[0]["name"], "Anna");
    assert_eq!(players[0]["number"], "7");
    assert_eq!(players[1]["totalPoints"], 5);
    assert_eq!(players[1]["fieldGoalsMade"], 2);

    let schedule = read_json(&paths.site_dir().join("kog_schedule.json"));
    assert_eq!(schedule[0]["matchId"], 7);
    assert_eq!(schedule[0]["opponent"], "Visitors");
    assert_eq!(schedule[0]["result"], "win");
    assert_eq!(schedule[0]["hasStats"], true);
    assert_eq!(schedule[0]["opponentTeamId"], AWAY);
    assert_eq!(schedule[1]["status"], "upcoming");

    let metadata = read_json(&paths.site_dir().join(METADATA_FILE));
    assert_eq!(metadata["playersTracked"], 2);
    assert_eq!(metadata["teamRecords"]["highestScore"]["kogPoints"], 8);
    assert_eq!(metadata["teamRecords"]["biggestWin"]["gameId"], 7);
    assert!(metadata["teamRecords"]["toughestLoss"].is_null());

    let game_summary = read_json(&paths.processed_dir().join("game_7_summary.json"));
    assert_eq!(game_summary["teamStats"][1]["teamId"], HOME);

    assert_eq!(read_json(&paths.site_dir().join("kog_links.json"))[0]["label"], "Table");
    assert!(outcome.written.iter().any(|p| p.ends_with("game_7.pretty.json")));
}

#[test]
fn test_malformed_files_are_skipped() {
    let (_temp_dir, config) = site_with_raw_dir();
    write_raw(&config, 1, &json!({"players": {"A": {"goals": 2}}}));
    fs::write(config.paths.raw_dir().join("game_2.json"), "{ truncated").unwrap();
    write_raw(&config, 3, &json!({"lineup": "not a list", "events": []}));
    let paths = config.paths.clone();

    let outcome = StatsBuilder::new(config).unwrap().run().unwrap();

    assert_eq!(outcome.site.metadata.games_processed, vec![1]);
    assert_eq!(read_json(&paths.site_dir().join(PLAYER_SUMMARY_FILE)), json!({"A": {"goals": 2}}));
    assert!(!paths.processed_dir().join("game_3.pretty.json").exists());
}
