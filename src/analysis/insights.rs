//! Talking points for the broadcast, derived from the other analyses.
//!
//! Statements come out in a fixed priority order: common-opponent advantage,
//! consistency, momentum (with streak call-outs), and head-to-head history
//! last. The thresholds are part of the output contract; changing any of them
//! changes which statements casters see.

use serde::Serialize;

use super::common_opponents::{common_opponents, CommonOpponents};
use super::head_to_head::{head_to_head, HeadToHead};
use super::recent_form::{recent_form, FormTrend, RecentForm, DEFAULT_FORM_WINDOW};
use super::records::{Outcome, RawMapRecord};

const CONSISTENCY_GAP: f64 = 0.15;
const HOT_MOMENTUM: f64 = 0.7;
const COLD_MOMENTUM: f64 = 0.4;
const MIN_STREAK: usize = 3;
const MIN_MAPS_FOR_FORM: usize = 3;
const MIN_OPPONENTS_FOR_CONSISTENCY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Advantage,
    Consistency,
    Momentum,
    History,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub text: String,
}

impl Insight {
    fn new(kind: InsightKind, text: String) -> Self {
        Insight { kind, text }
    }
}

/// Ordered talking points for `team_a` vs `team_b`.
pub fn insights(team_a: &str, team_b: &str, maps: &[RawMapRecord]) -> Vec<Insight> {
    let common = common_opponents(team_a, team_b, maps);
    let form_a = recent_form(team_a, maps, DEFAULT_FORM_WINDOW);
    let form_b = recent_form(team_b, maps, DEFAULT_FORM_WINDOW);
    let h2h = head_to_head(team_a, team_b, maps);

    compose(team_a.trim(), team_b.trim(), &common, &form_a, &form_b, &h2h)
}

/// Applies the talking-point rules to already computed analyses.
pub fn compose(
    team_a: &str,
    team_b: &str,
    common: &CommonOpponents,
    form_a: &RecentForm,
    form_b: &RecentForm,
    h2h: &HeadToHead,
) -> Vec<Insight> {
    let mut out = Vec::new();

    if let Some(insight) = advantage(team_a, team_b, common) {
        out.push(insight);
    }
    if let Some(insight) = consistency(team_a, team_b, common) {
        out.push(insight);
    }
    out.extend(momentum(team_a, team_b, form_a, form_b));
    out.push(history(team_a, team_b, h2h));

    tracing::debug!(team_a, team_b, count = out.len(), "Generated talking points");
    out
}

fn advantage(team_a: &str, team_b: &str, common: &CommonOpponents) -> Option<Insight> {
    let s = &common.summary;
    if s.common_count == 0 || s.team_a_advantages == s.team_b_advantages {
        return None;
    }

    let (leader, trailer, lead, trail) = if s.team_a_advantages > s.team_b_advantages {
        (team_a, team_b, s.team_a_advantages, s.team_b_advantages)
    } else {
        (team_b, team_a, s.team_b_advantages, s.team_a_advantages)
    };

    Some(Insight::new(
        InsightKind::Advantage,
        format!(
            "{} has fared better against common opponents, holding the edge in {} of {} shared matchups ({} for {}).",
            leader, lead, s.common_count, trail, trailer
        ),
    ))
}

fn consistency(team_a: &str, team_b: &str, common: &CommonOpponents) -> Option<Insight> {
    if common.summary.common_count < MIN_OPPONENTS_FOR_CONSISTENCY {
        return None;
    }

    let (spread_a, spread_b) = common.consistency();
    if (spread_a - spread_b).abs() < CONSISTENCY_GAP {
        return None;
    }

    let (steady, streaky) = if spread_a < spread_b {
        (team_a, team_b)
    } else {
        (team_b, team_a)
    };

    Some(Insight::new(
        InsightKind::Consistency,
        format!(
            "{} has been the more consistent side against shared opponents, while {} has swung between dominant and shaky results.",
            steady, streaky
        ),
    ))
}

fn momentum(team_a: &str, team_b: &str, form_a: &RecentForm, form_b: &RecentForm) -> Vec<Insight> {
    let mut out = Vec::new();
    if form_a.total_maps < MIN_MAPS_FOR_FORM || form_b.total_maps < MIN_MAPS_FOR_FORM {
        return out;
    }

    let hot_vs_cold = |hot: &RecentForm, cold: &RecentForm| {
        hot.momentum > HOT_MOMENTUM && cold.momentum < COLD_MOMENTUM
    };
    let diverging = |up: &RecentForm, down: &RecentForm| {
        up.trend == FormTrend::Rising && down.trend == FormTrend::Falling
    };

    let headline = if hot_vs_cold(form_a, form_b) {
        Some(hot_cold_text(team_a, form_a, team_b, form_b))
    } else if hot_vs_cold(form_b, form_a) {
        Some(hot_cold_text(team_b, form_b, team_a, form_a))
    } else if diverging(form_a, form_b) {
        Some(diverging_text(team_a, team_b))
    } else if diverging(form_b, form_a) {
        Some(diverging_text(team_b, team_a))
    } else {
        None
    };
    if let Some(text) = headline {
        out.push(Insight::new(InsightKind::Momentum, text));
    }

    for (team, form) in [(team_a, form_a), (team_b, form_b)] {
        if form.streak_type == Some(Outcome::Win) && form.streak >= MIN_STREAK {
            out.push(Insight::new(
                InsightKind::Momentum,
                format!("{} arrives on a {}-map win streak.", team, form.streak),
            ));
        }
    }

    out
}

fn hot_cold_text(hot: &str, hot_form: &RecentForm, cold: &str, cold_form: &RecentForm) -> String {
    format!(
        "{} comes in hot ({} over the last {} maps) while {} has gone cold ({}).",
        hot,
        hot_form.record,
        hot_form.last_n_results.len(),
        cold,
        cold_form.record
    )
}

fn diverging_text(rising: &str, falling: &str) -> String {
    format!(
        "{} is trending upward while {} has been sliding in recent maps.",
        rising, falling
    )
}

fn history(team_a: &str, team_b: &str, h2h: &HeadToHead) -> Insight {
    let text = if h2h.total_maps == 0 {
        format!(
            "No prior meetings between {} and {} in this data set.",
            team_a, team_b
        )
    } else if h2h.team_a_wins != h2h.team_b_wins {
        let (leader, trailer, lead, trail, margin) = if h2h.team_a_wins > h2h.team_b_wins {
            (team_a, team_b, h2h.team_a_wins, h2h.team_b_wins, h2h.frag_margin())
        } else {
            (team_b, team_a, h2h.team_b_wins, h2h.team_a_wins, -h2h.frag_margin())
        };
        format!(
            "{} leads the head-to-head {}-{} over {} across {} maps (frag margin {:+}).",
            leader, lead, trail, trailer, h2h.total_maps, margin
        )
    } else if h2h.team_a_wins > 0 {
        format!(
            "The head-to-head is dead level at {}-{} across {} maps.",
            h2h.team_a_wins, h2h.team_b_wins, h2h.total_maps
        )
    } else {
        format!(
            "{} and {} have met on {} maps, all drawn.",
            team_a, team_b, h2h.total_maps
        )
    };

    Insight::new(InsightKind::History, text)
}
