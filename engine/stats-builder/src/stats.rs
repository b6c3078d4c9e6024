//! Player summary: per-player stat totals folded across games

use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Stat name -> value for one player
pub type StatLine = BTreeMap<String, Number>;

/// Add two JSON numbers, staying integral when both sides are integers
pub fn add_numbers(a: &Number, b: &Number) -> Number {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Number::from(sum);
        }
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        if let Some(sum) = x.checked_add(y) {
            return Number::from(sum);
        }
    }

    let sum = a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0);
    Number::from_f64(sum).unwrap_or_else(|| a.clone())
}

/// Aggregated stats keyed by player identifier.
///
/// Backed by ordered maps so serialization is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlayerSummary(BTreeMap<String, StatLine>);

impl PlayerSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect contributions from a feed's top-level `players` object.
    ///
    /// Each player maps to an object of stat fields; only numeric fields count.
    pub fn from_player_map(document: &Value) -> Self {
        let mut summary = Self::new();
        let Some(players) = document.get("players").and_then(Value::as_object) else {
            return summary;
        };

        for (player, fields) in players {
            let Some(fields) = fields.as_object() else {
                continue;
            };
            let line: StatLine = fields
                .iter()
                .filter_map(|(name, value)| value.as_number().map(|n| (name.clone(), n.clone())))
                .collect();
            summary.add(player, &line);
        }

        summary
    }

    /// Add one stat line to a player's totals
    pub fn add(&mut self, player: &str, line: &StatLine) {
        let totals = self.0.entry(player.to_string()).or_default();
        for (stat, value) in line {
            match totals.get_mut(stat) {
                Some(existing) => *existing = add_numbers(existing, value),
                None => {
                    totals.insert(stat.clone(), value.clone());
                }
            }
        }
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: &PlayerSummary) {
        for (player, line) in &other.0 {
            self.add(player, line);
        }
    }

    pub fn get(&self, player: &str) -> Option<&StatLine> {
        self.0.get(player)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
