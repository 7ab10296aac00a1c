use serde::Serialize;

use super::normalize::normalize;
use super::records::{Outcome, RawMapRecord};
use super::ratio;

/// One head-to-head map, scores oriented towards team A.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadMap {
    pub map: String,
    pub date: Option<String>,
    pub team_a_score: u32,
    pub team_b_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub team_a: String,
    pub team_b: String,
    pub total_maps: usize,
    pub team_a_wins: usize,
    pub team_b_wins: usize,
    pub team_a_frags: u64,
    pub team_b_frags: u64,
    pub per_map: Vec<HeadToHeadMap>,
}

impl HeadToHead {
    pub fn frag_margin(&self) -> i64 {
        self.team_a_frags as i64 - self.team_b_frags as i64
    }

    pub fn draws(&self) -> usize {
        self.total_maps - self.team_a_wins - self.team_b_wins
    }
}

/// A team's record against one named opponent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentRecord {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub played: usize,
    pub frag_diff: i64,
    pub win_rate: f64,
}

/// Every map between `team_a` and `team_b`, in input order.
pub fn head_to_head(team_a: &str, team_b: &str, maps: &[RawMapRecord]) -> HeadToHead {
    let key_a = normalize(team_a);
    let key_b = normalize(team_b);

    let mut result = HeadToHead {
        team_a: team_a.trim().to_string(),
        team_b: team_b.trim().to_string(),
        total_maps: 0,
        team_a_wins: 0,
        team_b_wins: 0,
        team_a_frags: 0,
        team_b_frags: 0,
        per_map: Vec::new(),
    };

    for record in maps.iter().filter(|m| m.is_between(&key_a, &key_b)) {
        let (a_score, b_score) = if normalize(&record.team1) == key_b {
            (record.score2, record.score1)
        } else {
            (record.score1, record.score2)
        };

        result.total_maps += 1;
        result.team_a_frags += u64::from(a_score);
        result.team_b_frags += u64::from(b_score);
        match Outcome::from_scores(a_score, b_score) {
            Outcome::Win => result.team_a_wins += 1,
            Outcome::Loss => result.team_b_wins += 1,
            Outcome::Draw => {}
        }

        result.per_map.push(HeadToHeadMap {
            map: record.map.clone(),
            date: record.date.clone(),
            team_a_score: a_score,
            team_b_score: b_score,
        });
    }

    result
}

/// `team`'s wins, losses and frag differential against `opponent`.
pub fn record_against(team: &str, opponent: &str, maps: &[RawMapRecord]) -> OpponentRecord {
    let h2h = head_to_head(team, opponent, maps);
    OpponentRecord {
        wins: h2h.team_a_wins,
        losses: h2h.team_b_wins,
        draws: h2h.draws(),
        played: h2h.total_maps,
        frag_diff: h2h.frag_margin(),
        win_rate: ratio(h2h.team_a_wins, h2h.total_maps),
    }
}
