// Stats service payloads. The service's shapes are not fixed, so everything
// goes through `serde_json::Value` and is read defensively.

use serde::Serialize;
use serde_json::Value;

use crate::analysis::records::{count_from_value, RawMapRecord};

const MATCH_KEYS: [&str; 2] = ["matches", "games"];
const ROSTER_KEYS: [&str; 2] = ["players", "roster"];

/// Match-like entries from a payload: a bare array, or an array under
/// `matches` / `games`. Any other shape yields nothing.
pub fn extract_matches(payload: &Value) -> Vec<Value> {
    extract_under(payload, &MATCH_KEYS)
}

/// Roster entries: a bare array, or an array under `players` / `roster`.
pub fn extract_roster(payload: &Value) -> Vec<Value> {
    extract_under(payload, &ROSTER_KEYS)
}

fn extract_under(payload: &Value, keys: &[&str]) -> Vec<Value> {
    match payload {
        Value::Array(items) => items.clone(),
        Value::Object(fields) => keys
            .iter()
            .find_map(|k| fields.get(*k).and_then(Value::as_array))
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// A match from the stats service, read from whichever keys are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMatch {
    pub team1: String,
    pub team2: String,
    pub score1: u32,
    pub score2: u32,
    pub map: String,
    pub date: Option<String>,
}

impl GlobalMatch {
    /// `None` when the entry isn't an object or names no teams at all.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let text = |keys: &[&str]| -> Option<String> {
            keys.iter().find_map(|k| match obj.get(*k)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Object(inner) => inner
                    .get("name")
                    .or_else(|| inner.get("tag"))
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_string()),
                _ => None,
            })
        };
        let score = |keys: &[&str]| -> u32 {
            keys.iter()
                .find_map(|k| obj.get(*k).and_then(count_from_value))
                .unwrap_or(0)
        };

        let team1 = text(&["team1", "team_a", "teamA", "home"]).unwrap_or_default();
        let team2 = text(&["team2", "team_b", "teamB", "away"]).unwrap_or_default();
        if team1.is_empty() && team2.is_empty() {
            return None;
        }

        Some(GlobalMatch {
            team1,
            team2,
            score1: score(&["score1", "team1_score", "team1Score", "score_a"]),
            score2: score(&["score2", "team2_score", "team2Score", "score_b"]),
            map: text(&["map", "map_name", "mapName"]).unwrap_or_else(|| "unknown".to_string()),
            date: text(&["date", "played_at", "playedAt", "timestamp"]),
        })
    }

    pub fn into_record(self) -> RawMapRecord {
        RawMapRecord {
            team1: self.team1,
            team2: self.team2,
            score1: self.score1,
            score2: self.score2,
            map: self.map,
            date: self.date,
            division: None,
            players: Vec::new(),
        }
    }
}

/// Every readable match in a payload, as engine records.
pub fn records_from_payload(payload: &Value) -> Vec<RawMapRecord> {
    extract_matches(payload)
        .iter()
        .filter_map(GlobalMatch::from_value)
        .map(GlobalMatch::into_record)
        .collect()
}

/// Player names from a roster payload (plain strings or objects with a name).
pub fn roster_names(payload: &Value) -> Vec<String> {
    extract_roster(payload)
        .iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(name.trim().to_string()),
            Value::Object(fields) => ["name", "nick", "player"]
                .iter()
                .find_map(|k| fields.get(*k).and_then(Value::as_str))
                .map(|s| s.trim().to_string()),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .collect()
}
