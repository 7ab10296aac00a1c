use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::normalize::normalize;

/// One completed map within a tournament.
///
/// Every field tolerates being absent, `null` or loosely typed (numeric
/// strings, floats); defaults are applied here so the aggregators never have
/// to re-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMapRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub team1: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub team2: String,
    #[serde(default, alias = "team1Score", deserialize_with = "lenient_count")]
    pub score1: u32,
    #[serde(default, alias = "team2Score", deserialize_with = "lenient_count")]
    pub score2: u32,
    #[serde(default = "unknown_map", alias = "mapName", deserialize_with = "map_name")]
    pub map: String,
    #[serde(default, deserialize_with = "date_text")]
    pub date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_text"
    )]
    pub division: Option<String>,
    #[serde(default, deserialize_with = "player_lines")]
    pub players: Vec<PlayerMapRecord>,
}

/// One player's line for one map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerMapRecord {
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub team: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub frags: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub deaths: u32,
}

/// A map seen from one team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perspective<'a> {
    pub frags_for: u32,
    pub frags_against: u32,
    pub opponent: &'a str,
}

impl Perspective<'_> {
    pub fn outcome(&self) -> Outcome {
        Outcome::from_scores(self.frags_for, self.frags_against)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
    #[serde(rename = "D")]
    Draw,
}

impl Outcome {
    pub fn from_scores(ours: u32, theirs: u32) -> Self {
        match ours.cmp(&theirs) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Outcome::Win => "W",
            Outcome::Loss => "L",
            Outcome::Draw => "D",
        }
    }

    /// Contribution to momentum: 1 for a win, 0.5 for a draw, 0 for a loss.
    pub fn value(&self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.5,
            Outcome::Loss => 0.0,
        }
    }
}

impl RawMapRecord {
    pub fn new(team1: &str, team2: &str, score1: u32, score2: u32, map: &str, date: &str) -> Self {
        RawMapRecord {
            team1: team1.to_string(),
            team2: team2.to_string(),
            score1,
            score2,
            map: map.to_string(),
            date: Some(date.to_string()),
            division: None,
            players: Vec::new(),
        }
    }

    pub fn with_players(mut self, players: Vec<PlayerMapRecord>) -> Self {
        self.players = players;
        self
    }

    /// Parsed `date`; absent or unparseable values sort as the Unix epoch.
    pub fn played_at(&self) -> DateTime<Utc> {
        self.date
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Whether `team_key` (already normalized) is on either side.
    pub fn involves(&self, team_key: &str) -> bool {
        normalize(&self.team1) == team_key || normalize(&self.team2) == team_key
    }

    /// Whether this map was played between the two normalized keys, in either orientation.
    pub fn is_between(&self, key_a: &str, key_b: &str) -> bool {
        let t1 = normalize(&self.team1);
        let t2 = normalize(&self.team2);
        (t1 == key_a && t2 == key_b) || (t1 == key_b && t2 == key_a)
    }

    /// Scores and opponent oriented towards `team_key`, or `None` if the team didn't play.
    pub fn perspective(&self, team_key: &str) -> Option<Perspective<'_>> {
        if normalize(&self.team1) == team_key {
            Some(Perspective {
                frags_for: self.score1,
                frags_against: self.score2,
                opponent: &self.team2,
            })
        } else if normalize(&self.team2) == team_key {
            Some(Perspective {
                frags_for: self.score2,
                frags_against: self.score1,
                opponent: &self.team1,
            })
        } else {
            None
        }
    }
}

impl PlayerMapRecord {
    pub fn new(name: &str, team: &str, frags: u32, deaths: u32) -> Self {
        PlayerMapRecord {
            name: Some(name.to_string()),
            team: team.to_string(),
            frags,
            deaths,
        }
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn unknown_map() -> String {
    "unknown".to_string()
}

/// A non-negative count from an integer, a float or a numeric string.
/// Negative and non-numeric values read as `None`.
pub(crate) fn count_from_value(value: &Value) -> Option<u32> {
    let count = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }?;
    Some(count.min(u64::from(u32::MAX)) as u32)
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(count_from_value(&Value::deserialize(deserializer)?).unwrap_or(0))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_from_value(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_from_value(Value::deserialize(deserializer)?))
}

// Only strings are dates; numeric timestamps read as absent.
fn date_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn map_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_from_value(Value::deserialize(deserializer)?)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(unknown_map))
}

fn player_lines<'de, D>(deserializer: D) -> Result<Vec<PlayerMapRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}
