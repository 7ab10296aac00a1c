use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::head_to_head::{record_against, OpponentRecord};
use super::normalize::normalize;
use super::records::RawMapRecord;

/// Minimum dominance gap before one side is credited with the advantage.
pub const ADVANTAGE_THRESHOLD: f64 = 0.15;
const NEUTRAL_DOMINANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Advantage {
    Team1,
    Team2,
    Even,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonOpponentEntry {
    pub opponent: String,
    pub team_a: OpponentRecord,
    pub team_b: OpponentRecord,
    pub dominance_a: f64,
    pub dominance_b: f64,
    pub advantage: Advantage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonOpponentSummary {
    pub common_count: usize,
    pub team_a_advantages: usize,
    pub team_b_advantages: usize,
    pub team_a_avg_dominance: f64,
    pub team_b_avg_dominance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonOpponents {
    pub breakdown: Vec<CommonOpponentEntry>,
    pub summary: CommonOpponentSummary,
}

impl CommonOpponents {
    /// Population standard deviation of each side's per-opponent win rate
    /// around its mean dominance.
    pub fn consistency(&self) -> (f64, f64) {
        let spread = |values: Vec<f64>, mean: f64| {
            if values.is_empty() {
                return 0.0;
            }
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
            variance.sqrt()
        };

        (
            spread(
                self.breakdown.iter().map(|e| e.dominance_a).collect(),
                self.summary.team_a_avg_dominance,
            ),
            spread(
                self.breakdown.iter().map(|e| e.dominance_b).collect(),
                self.summary.team_b_avg_dominance,
            ),
        )
    }
}

/// Normalized opponent key -> first-seen display name, for every team `key` has faced.
fn opponents_of(key: &str, maps: &[RawMapRecord]) -> BTreeMap<String, String> {
    let mut opponents = BTreeMap::new();
    for side in maps.iter().filter_map(|m| m.perspective(key)) {
        let opponent_key = normalize(side.opponent);
        if opponent_key.is_empty() || opponent_key == key {
            continue;
        }
        opponents
            .entry(opponent_key)
            .or_insert_with(|| side.opponent.trim().to_string());
    }
    opponents
}

/// Strength-of-schedule comparison through the opponents both teams have played.
pub fn common_opponents(team_a: &str, team_b: &str, maps: &[RawMapRecord]) -> CommonOpponents {
    let key_a = normalize(team_a);
    let key_b = normalize(team_b);

    let faced_by_a = opponents_of(&key_a, maps);
    let faced_by_b = opponents_of(&key_b, maps);

    let shared: BTreeSet<&String> = faced_by_a
        .keys()
        .filter(|k| faced_by_b.contains_key(*k))
        .filter(|k| **k != key_a && **k != key_b)
        .collect();

    let breakdown: Vec<CommonOpponentEntry> = shared
        .into_iter()
        .map(|key| {
            let team_a = record_against(&key_a, key, maps);
            let team_b = record_against(&key_b, key, maps);
            let dominance_a = team_a.win_rate;
            let dominance_b = team_b.win_rate;

            let diff = dominance_a - dominance_b;
            let advantage = if diff.abs() >= ADVANTAGE_THRESHOLD {
                if diff > 0.0 {
                    Advantage::Team1
                } else {
                    Advantage::Team2
                }
            } else {
                Advantage::Even
            };

            CommonOpponentEntry {
                opponent: faced_by_a[key].clone(),
                team_a,
                team_b,
                dominance_a,
                dominance_b,
                advantage,
            }
        })
        .collect();

    let mean = |values: Vec<f64>| {
        if values.is_empty() {
            NEUTRAL_DOMINANCE
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    };

    let summary = CommonOpponentSummary {
        common_count: breakdown.len(),
        team_a_advantages: breakdown
            .iter()
            .filter(|e| e.advantage == Advantage::Team1)
            .count(),
        team_b_advantages: breakdown
            .iter()
            .filter(|e| e.advantage == Advantage::Team2)
            .count(),
        team_a_avg_dominance: mean(breakdown.iter().map(|e| e.dominance_a).collect()),
        team_b_avg_dominance: mean(breakdown.iter().map(|e| e.dominance_b).collect()),
    };

    CommonOpponents { breakdown, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(t1: &str, t2: &str, s1: u32, s2: u32) -> RawMapRecord {
        RawMapRecord::new(t1, t2, s1, s2, "dm3", "2024-01-01")
    }

    #[test]
    fn test_clear_advantage() {
        let maps = vec![
            game("Alpha", "Gamma", 10, 1),
            game("gamma", "alpha", 2, 11),
            game("Alpha", "Gamma", 9, 3),
            game("Beta", "Gamma", 1, 10),
            game("Gamma", "Beta", 12, 4),
            game("beta", "GAMMA", 0, 5),
        ];

        let result = common_opponents("Alpha", "Beta", &maps);
        assert_eq!(result.breakdown.len(), 1);

        let entry = &result.breakdown[0];
        assert_eq!(entry.opponent, "Gamma");
        assert_eq!(entry.team_a.wins, 3);
        assert_eq!(entry.team_b.losses, 3);
        assert_eq!(entry.dominance_a, 1.0);
        assert_eq!(entry.dominance_b, 0.0);
        assert_eq!(entry.advantage, Advantage::Team1);

        assert_eq!(result.summary.common_count, 1);
        assert_eq!(result.summary.team_a_advantages, 1);
        assert_eq!(result.summary.team_b_advantages, 0);
    }

    #[test]
    fn test_small_gap_is_even() {
        let maps = vec![
            game("Alpha", "Gamma", 10, 1),
            game("Alpha", "Gamma", 1, 10),
            game("Beta", "Gamma", 10, 1),
            game("Beta", "Gamma", 1, 10),
        ];
        let result = common_opponents("Alpha", "Beta", &maps);
        assert_eq!(result.breakdown[0].advantage, Advantage::Even);
    }

    #[test]
    fn test_teams_never_their_own_common_opponent() {
        let maps = vec![
            game("Alpha", "Beta", 10, 1),
            game("Alpha", "alpha", 3, 3),
            game("Beta", "BETA", 1, 0),
            game("Beta", "Alpha", 5, 6),
            game("Alpha", "Gamma", 5, 6),
            game("Beta", "Gamma", 5, 6),
        ];
        let result = common_opponents("Alpha", "Beta", &maps);
        let keys: Vec<String> = result.breakdown.iter().map(|e| normalize(&e.opponent)).collect();
        assert_eq!(keys, vec!["gamma"]);
    }

    #[test]
    fn test_no_common_opponents_defaults() {
        let maps = vec![game("Alpha", "Gamma", 1, 0), game("Beta", "Delta", 1, 0)];
        let result = common_opponents("Alpha", "Beta", &maps);
        assert!(result.breakdown.is_empty());
        assert_eq!(result.summary.common_count, 0);
        assert_eq!(result.summary.team_a_avg_dominance, 0.5);
        assert_eq!(result.summary.team_b_avg_dominance, 0.5);
        assert_eq!(result.consistency(), (0.0, 0.0));
    }

    #[test]
    fn test_consistency() {
        let maps = vec![
            game("Alpha", "Gamma", 1, 0),
            game("Alpha", "Delta", 0, 1),
            game("Beta", "Gamma", 1, 0),
            game("Beta", "Gamma", 0, 1),
            game("Beta", "Delta", 1, 0),
            game("Beta", "Delta", 0, 1),
        ];
        let result = common_opponents("Alpha", "Beta", &maps);
        let (spread_a, spread_b) = result.consistency();
        assert!((spread_a - 0.5).abs() < 1e-9);
        assert_eq!(spread_b, 0.0);
    }
}
