use serde::Serialize;
use std::collections::BTreeMap;

use super::common_opponents::{common_opponents, CommonOpponents};
use super::head_to_head::{head_to_head, HeadToHead};
use super::insights::{compose, Insight};
use super::map_stats::{map_stats, MapStats};
use super::player_stats::{player_spotlight, player_stats, roster_for, PlayerStats, Spotlight};
use super::recent_form::{recent_form, RecentForm, DEFAULT_FORM_WINDOW};
use super::records::RawMapRecord;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub form_window: usize,
    pub spotlight_min_maps: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            form_window: DEFAULT_FORM_WINDOW,
            spotlight_min_maps: 2,
        }
    }
}

/// Everything a caster needs for one matchup, computed from one map list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupReport {
    pub team_a: String,
    pub team_b: String,
    pub head_to_head: HeadToHead,
    pub form_a: RecentForm,
    pub form_b: RecentForm,
    pub maps_a: BTreeMap<String, MapStats>,
    pub maps_b: BTreeMap<String, MapStats>,
    pub common_opponents: CommonOpponents,
    pub players: BTreeMap<String, PlayerStats>,
    pub roster_a: Vec<PlayerStats>,
    pub roster_b: Vec<PlayerStats>,
    pub spotlight: Spotlight,
    pub insights: Vec<Insight>,
}

impl MatchupReport {
    pub fn build(team_a: &str, team_b: &str, maps: &[RawMapRecord], options: &ReportOptions) -> Self {
        let team_a = team_a.trim();
        let team_b = team_b.trim();

        let head_to_head = head_to_head(team_a, team_b, maps);
        let form_a = recent_form(team_a, maps, options.form_window);
        let form_b = recent_form(team_b, maps, options.form_window);
        let common_opponents = common_opponents(team_a, team_b, maps);

        // Talking points always read the default form window.
        let insights = if options.form_window == DEFAULT_FORM_WINDOW {
            compose(team_a, team_b, &common_opponents, &form_a, &form_b, &head_to_head)
        } else {
            compose(
                team_a,
                team_b,
                &common_opponents,
                &recent_form(team_a, maps, DEFAULT_FORM_WINDOW),
                &recent_form(team_b, maps, DEFAULT_FORM_WINDOW),
                &head_to_head,
            )
        };

        let players = player_stats(maps);
        let spotlight = player_spotlight(&players, options.spotlight_min_maps);
        let roster_a: Vec<PlayerStats> = roster_for(team_a, &players).into_iter().cloned().collect();
        let roster_b: Vec<PlayerStats> = roster_for(team_b, &players).into_iter().cloned().collect();

        tracing::debug!(
            team_a,
            team_b,
            h2h_maps = head_to_head.total_maps,
            common = common_opponents.summary.common_count,
            players = players.len(),
            "Built matchup report"
        );

        MatchupReport {
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
            maps_a: map_stats(team_a, maps),
            maps_b: map_stats(team_b, maps),
            head_to_head,
            form_a,
            form_b,
            common_opponents,
            players,
            roster_a,
            roster_b,
            spotlight,
            insights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::insights::insights;
    use crate::analysis::records::PlayerMapRecord;

    fn sample() -> Vec<RawMapRecord> {
        vec![
            RawMapRecord::new("Alpha", "Beta", 10, 5, "dm3", "2024-01-01")
                .with_players(vec![PlayerMapRecord::new("Rocket", "Alpha", 10, 5)]),
            RawMapRecord::new("Gamma", "Alpha", 2, 7, "dm6", "2024-01-02")
                .with_players(vec![PlayerMapRecord::new("Rocket", "Alpha", 7, 2)]),
            RawMapRecord::new("Beta", "Gamma", 4, 4, "dm3", "2024-01-03"),
        ]
    }

    #[test]
    fn test_report_matches_individual_analyses() {
        let maps = sample();
        let report = MatchupReport::build(" Alpha", "Beta ", &maps, &ReportOptions::default());

        assert_eq!(report.team_a, "Alpha");
        assert_eq!(report.head_to_head, head_to_head("Alpha", "Beta", &maps));
        assert_eq!(report.insights, insights("Alpha", "Beta", &maps));
        assert_eq!(report.maps_a.len(), 2);
        assert_eq!(report.common_opponents.summary.common_count, 1);
        assert_eq!(report.spotlight.hot_hands.len(), 1);
        assert_eq!(report.roster_a.len(), 1);
        assert_eq!(report.roster_a[0].name, "Rocket");
        assert!(report.roster_b.is_empty());
    }

    #[test]
    fn test_window_only_changes_display() {
        let maps = sample();
        let options = ReportOptions {
            form_window: 1,
            spotlight_min_maps: 2,
        };
        let report = MatchupReport::build("Alpha", "Beta", &maps, &options);

        assert_eq!(report.form_a.last_n_results.len(), 1);
        assert_eq!(report.insights, insights("Alpha", "Beta", &maps));
    }

    #[test]
    fn test_report_is_deterministic() {
        let maps = sample();
        let first = serde_json::to_string(&MatchupReport::build("Alpha", "Beta", &maps, &ReportOptions::default())).unwrap();
        let second = serde_json::to_string(&MatchupReport::build("Alpha", "Beta", &maps, &ReportOptions::default())).unwrap();
        assert_eq!(first, second);
    }
}
