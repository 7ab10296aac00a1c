use serde::Serialize;
use std::collections::BTreeMap;

use super::normalize::normalize;
use super::records::RawMapRecord;
use super::round_to;

const TREND_WINDOW: usize = 3;
const HOT_FACTOR: f64 = 1.1;
const COLD_FACTOR: f64 = 0.9;
const SPOTLIGHT_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerTrend {
    Hot,
    Cold,
    Steady,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub name: String,
    pub team: String,
    pub maps_played: usize,
    pub total_frags: u64,
    pub total_deaths: u64,
    pub kd_ratio: f64,
    pub frags_per_map: f64,
    pub trend: PlayerTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spotlight {
    pub hot_hands: Vec<PlayerStats>,
    pub struggling: Vec<PlayerStats>,
}

struct PlayerTally {
    name: String,
    team: String,
    frags: Vec<u32>,
    deaths: u64,
}

/// Cumulative frags, deaths and K/D per player, keyed by normalized name.
pub fn player_stats(maps: &[RawMapRecord]) -> BTreeMap<String, PlayerStats> {
    let mut tallies: BTreeMap<String, PlayerTally> = BTreeMap::new();

    for player in maps.iter().flat_map(|m| m.players.iter()) {
        let Some(name) = player.name.as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };

        let tally = tallies
            .entry(normalize(name))
            .or_insert_with(|| PlayerTally {
                name: name.trim().to_string(),
                team: String::new(),
                frags: Vec::new(),
                deaths: 0,
            });

        if !player.team.trim().is_empty() {
            tally.team = player.team.trim().to_string();
        }
        tally.frags.push(player.frags);
        tally.deaths += u64::from(player.deaths);
    }

    tallies
        .into_iter()
        .map(|(key, tally)| (key, tally.finish()))
        .collect()
}

impl PlayerTally {
    fn finish(self) -> PlayerStats {
        let maps_played = self.frags.len();
        let total_frags: u64 = self.frags.iter().map(|&f| u64::from(f)).sum();

        let kd_ratio = if self.deaths > 0 {
            round_to(total_frags as f64 / self.deaths as f64, 2)
        } else {
            total_frags as f64
        };

        let frags_per_map = if maps_played == 0 {
            0.0
        } else {
            round_to(total_frags as f64 / maps_played as f64, 1)
        };

        let recent = &self.frags[maps_played.saturating_sub(TREND_WINDOW)..];
        let trend = classify_trend(recent, frags_per_map);

        PlayerStats {
            name: self.name,
            team: self.team,
            maps_played,
            total_frags,
            total_deaths: self.deaths,
            kd_ratio,
            frags_per_map,
            trend,
        }
    }
}

fn classify_trend(recent: &[u32], frags_per_map: f64) -> PlayerTrend {
    if recent.is_empty() || frags_per_map <= 0.0 {
        return PlayerTrend::Steady;
    }

    let recent_avg = recent.iter().map(|&f| f as f64).sum::<f64>() / recent.len() as f64;
    if recent_avg >= frags_per_map * HOT_FACTOR {
        PlayerTrend::Hot
    } else if recent_avg <= frags_per_map * COLD_FACTOR {
        PlayerTrend::Cold
    } else {
        PlayerTrend::Steady
    }
}

/// Top and bottom performers by K/D among players with at least `min_maps` maps.
///
/// `struggling` lists the worst K/D first.
pub fn player_spotlight(stats: &BTreeMap<String, PlayerStats>, min_maps: usize) -> Spotlight {
    let mut eligible: Vec<&PlayerStats> = stats
        .values()
        .filter(|p| p.maps_played >= min_maps)
        .collect();

    eligible.sort_by(|a, b| {
        b.kd_ratio
            .partial_cmp(&a.kd_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let hot_hands = eligible.iter().take(SPOTLIGHT_SIZE).map(|&p| p.clone()).collect();
    let struggling = eligible
        .iter()
        .rev()
        .take(SPOTLIGHT_SIZE)
        .map(|&p| p.clone())
        .collect();

    Spotlight {
        hot_hands,
        struggling,
    }
}

/// Players whose most recent team label is `team`, best K/D first.
pub fn roster_for<'a>(team: &str, stats: &'a BTreeMap<String, PlayerStats>) -> Vec<&'a PlayerStats> {
    let key = normalize(team);
    let mut roster: Vec<&PlayerStats> = stats
        .values()
        .filter(|p| normalize(&p.team) == key)
        .collect();
    roster.sort_by(|a, b| {
        b.kd_ratio
            .partial_cmp(&a.kd_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::records::PlayerMapRecord;

    fn map_with(players: Vec<PlayerMapRecord>) -> RawMapRecord {
        RawMapRecord::new("Alpha", "Beta", 0, 0, "dm3", "2024-01-01").with_players(players)
    }

    #[test]
    fn test_player_stats_aggregates_by_normalized_name() {
        let maps = vec![
            map_with(vec![PlayerMapRecord::new("Rocket", "Alpha", 20, 10)]),
            map_with(vec![PlayerMapRecord::new(" rocket ", "ALPHA Prime", 10, 5)]),
        ];

        let stats = player_stats(&maps);
        assert_eq!(stats.len(), 1);

        let rocket = &stats["rocket"];
        assert_eq!(rocket.name, "Rocket");
        assert_eq!(rocket.team, "ALPHA Prime");
        assert_eq!(rocket.maps_played, 2);
        assert_eq!(rocket.total_frags, 30);
        assert_eq!(rocket.total_deaths, 15);
        assert_eq!(rocket.kd_ratio, 2.0);
        assert_eq!(rocket.frags_per_map, 15.0);
    }

    #[test]
    fn test_nameless_players_skipped() {
        let mut nameless = PlayerMapRecord::new("", "Alpha", 50, 0);
        nameless.name = None;
        let maps = vec![map_with(vec![nameless, PlayerMapRecord::new("   ", "Alpha", 3, 1)])];

        assert!(player_stats(&maps).is_empty());
    }

    #[test]
    fn test_kd_without_deaths_is_raw_frags() {
        let maps = vec![map_with(vec![PlayerMapRecord::new("Ghost", "Alpha", 17, 0)])];
        assert_eq!(player_stats(&maps)["ghost"].kd_ratio, 17.0);
    }

    #[test]
    fn test_kd_rounded_to_two_decimals() {
        let maps = vec![map_with(vec![PlayerMapRecord::new("Ace", "Alpha", 10, 3)])];
        assert_eq!(player_stats(&maps)["ace"].kd_ratio, 3.33);
    }

    #[test]
    fn test_totals_do_not_overflow() {
        let maps = vec![
            map_with(vec![PlayerMapRecord::new("Big", "Alpha", u32::MAX, u32::MAX)]),
            map_with(vec![PlayerMapRecord::new("Big", "Alpha", 1, 1)]),
        ];
        let big = &player_stats(&maps)["big"];

        assert_eq!(big.total_frags, u64::from(u32::MAX) + 1);
        assert_eq!(big.total_deaths, u64::from(u32::MAX) + 1);
        assert_eq!(big.kd_ratio, 1.0);
    }

    #[test]
    fn test_trend_thresholds() {
        // 13.3 per map; last three average 13.33, inside the +/-10% band
        let flat: Vec<RawMapRecord> = [10, 10, 20]
            .iter()
            .map(|&f| map_with(vec![PlayerMapRecord::new("Flat", "Alpha", f, 5)]))
            .collect();
        assert_eq!(player_stats(&flat)["flat"].trend, PlayerTrend::Steady);

        // 10 per map overall; last three average 16.67
        let rising: Vec<RawMapRecord> = [0, 0, 10, 20, 20]
            .iter()
            .map(|&f| map_with(vec![PlayerMapRecord::new("Up", "Alpha", f, 5)]))
            .collect();
        assert_eq!(player_stats(&rising)["up"].trend, PlayerTrend::Hot);

        // 12 per map overall; last three average 3.33
        let falling: Vec<RawMapRecord> = [25, 25, 5, 0, 5]
            .iter()
            .map(|&f| map_with(vec![PlayerMapRecord::new("Down", "Alpha", f, 5)]))
            .collect();
        assert_eq!(player_stats(&falling)["down"].trend, PlayerTrend::Cold);
    }

    #[test]
    fn test_zero_frag_player_is_steady() {
        let maps = vec![
            map_with(vec![PlayerMapRecord::new("Bench", "Alpha", 0, 4)]),
            map_with(vec![PlayerMapRecord::new("Bench", "Alpha", 0, 4)]),
        ];
        assert_eq!(player_stats(&maps)["bench"].trend, PlayerTrend::Steady);
    }

    #[test]
    fn test_spotlight() {
        let lines = [
            ("A", 30, 10),
            ("B", 20, 10),
            ("C", 10, 10),
            ("D", 5, 10),
            ("E", 2, 10),
        ];
        let mut maps = Vec::new();
        for _ in 0..2 {
            maps.push(map_with(
                lines
                    .iter()
                    .map(|&(n, f, d)| PlayerMapRecord::new(n, "Alpha", f, d))
                    .collect(),
            ));
        }
        // One-map player with the best K/D stays out of the spotlight
        maps.push(map_with(vec![PlayerMapRecord::new("Sub", "Alpha", 40, 1)]));

        let spotlight = player_spotlight(&player_stats(&maps), 2);
        let hot: Vec<&str> = spotlight.hot_hands.iter().map(|p| p.name.as_str()).collect();
        let cold: Vec<&str> = spotlight.struggling.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(hot, vec!["A", "B", "C"]);
        assert_eq!(cold, vec!["E", "D", "C"]);
    }

    #[test]
    fn test_spotlight_with_few_players() {
        let maps = vec![
            map_with(vec![PlayerMapRecord::new("Solo", "Alpha", 9, 3)]),
            map_with(vec![PlayerMapRecord::new("Solo", "Alpha", 9, 3)]),
        ];
        let spotlight = player_spotlight(&player_stats(&maps), 2);
        assert_eq!(spotlight.hot_hands.len(), 1);
        assert_eq!(spotlight.struggling.len(), 1);

        assert!(player_spotlight(&player_stats(&maps), 3).hot_hands.is_empty());
    }

    #[test]
    fn test_roster_for() {
        let maps = vec![map_with(vec![
            PlayerMapRecord::new("One", "Alpha", 10, 10),
            PlayerMapRecord::new("Two", "alpha ", 20, 10),
            PlayerMapRecord::new("Three", "Beta", 20, 10),
        ])];
        let stats = player_stats(&maps);
        let roster: Vec<&str> = roster_for("ALPHA", &stats).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(roster, vec!["Two", "One"]);
    }
}
