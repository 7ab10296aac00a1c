use serde::Serialize;

use super::normalize::normalize;
use super::records::{Outcome, RawMapRecord};

pub const DEFAULT_FORM_WINDOW: usize = 5;
const NEUTRAL_MOMENTUM: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormTrend {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResult {
    pub map: String,
    pub date: Option<String>,
    pub opponent: String,
    pub frags_for: u32,
    pub frags_against: u32,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentForm {
    pub total_maps: usize,
    #[serde(rename = "lastNResults")]
    pub last_n_results: Vec<FormResult>,
    pub record: String,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub momentum: f64,
    pub trend: FormTrend,
    pub streak: usize,
    pub streak_type: Option<Outcome>,
}

/// Chronological form over the last `last_n` maps `team` played.
pub fn recent_form(team: &str, maps: &[RawMapRecord], last_n: usize) -> RecentForm {
    let key = normalize(team);

    let mut played: Vec<&RawMapRecord> = maps.iter().filter(|m| m.involves(&key)).collect();
    played.sort_by_key(|m| m.played_at());

    let total_maps = played.len();
    let results: Vec<FormResult> = played[total_maps.saturating_sub(last_n)..]
        .iter()
        .filter_map(|record| {
            let side = record.perspective(&key)?;
            Some(FormResult {
                map: record.map.clone(),
                date: record.date.clone(),
                opponent: side.opponent.to_string(),
                frags_for: side.frags_for,
                frags_against: side.frags_against,
                outcome: side.outcome(),
            })
        })
        .collect();

    let count = |outcome: Outcome| results.iter().filter(|r| r.outcome == outcome).count();
    let wins = count(Outcome::Win);
    let losses = count(Outcome::Loss);
    let draws = count(Outcome::Draw);

    let record = if draws > 0 {
        format!("{}W-{}L-{}D", wins, losses, draws)
    } else {
        format!("{}W-{}L", wins, losses)
    };

    let (streak, streak_type) = current_streak(&results);

    RecentForm {
        total_maps,
        momentum: momentum(&results),
        trend: trend(&results),
        last_n_results: results,
        record,
        wins,
        losses,
        draws,
        streak,
        streak_type,
    }
}

/// Recency-weighted outcome average in [0, 1]; the i-th of n results weighs i/n.
fn momentum(results: &[FormResult]) -> f64 {
    if results.is_empty() {
        return NEUTRAL_MOMENTUM;
    }

    let len = results.len() as f64;
    let (weighted, total_weight) = results.iter().enumerate().fold(
        (0.0, 0.0),
        |(weighted, total_weight), (idx, result)| {
            let weight = (idx + 1) as f64 / len;
            (weighted + result.outcome.value() * weight, total_weight + weight)
        },
    );

    weighted / total_weight
}

fn trend(results: &[FormResult]) -> FormTrend {
    let half = results.len() / 2;
    let wins_in = |slice: &[FormResult]| {
        slice.iter().filter(|r| r.outcome == Outcome::Win).count() as i64
    };
    let first = wins_in(&results[..half]);
    let second = wins_in(&results[half..]);

    if second - first > 1 {
        FormTrend::Rising
    } else if first - second > 1 {
        FormTrend::Falling
    } else {
        FormTrend::Stable
    }
}

fn current_streak(results: &[FormResult]) -> (usize, Option<Outcome>) {
    let Some(last) = results.last() else {
        return (0, None);
    };

    let streak = results
        .iter()
        .rev()
        .take_while(|r| r.outcome == last.outcome)
        .count();
    (streak, Some(last.outcome))
}
