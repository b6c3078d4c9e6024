//! Raw feed cache reader

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{BuildError, Result};

/// One cached game feed
#[derive(Debug, Clone)]
pub struct RawGame {
    pub game_id: u64,
    pub path: PathBuf,
    pub document: Value,
}

/// Name of the cache file for `game_id`
pub fn raw_file_name(game_id: u64) -> String {
    format!("game_{}.json", game_id)
}

/// Game id encoded in a cache file name (`game_<digits>.json`)
pub fn game_id_from_file_name(file_name: &str) -> Option<u64> {
    let digits = file_name.strip_prefix("game_")?.strip_suffix(".json")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Load every cached game from `raw_dir`, ordered by game id.
///
/// Files are read in file-name order; when two files resolve to the same game id the
/// later one wins. Unreadable or unparseable files are skipped with a warning.
pub fn load_raw_games(raw_dir: &Path) -> Result<Vec<RawGame>> {
    if !raw_dir.is_dir() {
        return Err(BuildError::MissingRawDir(raw_dir.to_path_buf()));
    }

    let mut candidates: Vec<(String, u64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(raw_dir).map_err(|e| BuildError::io(raw_dir, e))? {
        let path = entry.map_err(|e| BuildError::io(raw_dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            continue;
        };
        if let Some(game_id) = game_id_from_file_name(&name) {
            candidates.push((name, game_id, path));
        }
    }
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut games: BTreeMap<u64, RawGame> = BTreeMap::new();
    for (_, game_id, path) in candidates {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                continue;
            }
        };
        let document: Value = match serde_json::from_str(&text) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping {:?}: invalid JSON: {}", path, e);
                continue;
            }
        };

        debug!("Loaded game {} from {:?}", game_id, path);
        if let Some(previous) = games.insert(game_id, RawGame { game_id, path, document }) {
            warn!("Game {} is cached more than once; {:?} is replaced", game_id, previous.path);
        }
    }

    Ok(games.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_game_id_from_file_name() {
        assert_eq!(game_id_from_file_name("game_123.json"), Some(123));
        assert_eq!(game_id_from_file_name("game_007.json"), Some(7));
        assert_eq!(game_id_from_file_name("game_.json"), None);
        assert_eq!(game_id_from_file_name("game_12a.json"), None);
        assert_eq!(game_id_from_file_name("game_12.pretty.json"), None);
        assert_eq!(game_id_from_file_name("notes.txt"), None);
        assert_eq!(raw_file_name(55), "game_55.json");
    }

    #[test]
    fn test_missing_raw_dir_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_raw_games(&temp_dir.path().join("raw")).unwrap_err();
        assert!(matches!(err, BuildError::MissingRawDir(_)));
    }

    #[test]
    fn test_games_are_ordered_by_id_and_bad_files_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let raw = temp_dir.path();
        fs::write(raw.join("game_10.json"), r#"{"players":{}}"#).unwrap();
        fs::write(raw.join("game_2.json"), r#"{"players":{}}"#).unwrap();
        fs::write(raw.join("game_3.json"), "{ not json").unwrap();
        fs::write(raw.join("README.md"), "ignored").unwrap();

        let games = load_raw_games(raw).unwrap();
        let ids: Vec<u64> = games.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![2, 10]);
    }

    #[test]
    fn test_duplicate_game_id_last_file_wins() {
        let temp_dir = TempDir::new().unwrap();
        let raw = temp_dir.path();
        fs::write(raw.join("game_07.json"), r#"{"source":"first"}"#).unwrap();
        fs::write(raw.join("game_7.json"), r#"{"source":"second"}"#).unwrap();

        let games = load_raw_games(raw).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].document["source"], "second");
    }
}
