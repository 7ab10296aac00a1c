use serde::Serialize;
use std::collections::BTreeMap;

use super::normalize::normalize;
use super::records::{Outcome, RawMapRecord};
use super::{ratio, round_to};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStats {
    pub wins: usize,
    pub losses: usize,
    pub played: usize,
    pub win_rate: f64,
    pub avg_frag_diff: i64,
}

#[derive(Default)]
struct MapTally {
    wins: usize,
    losses: usize,
    played: usize,
    frags_for: i64,
    frags_against: i64,
}

impl MapTally {
    fn finish(&self) -> MapStats {
        let avg_frag_diff = if self.played == 0 {
            0
        } else {
            round_to(
                (self.frags_for - self.frags_against) as f64 / self.played as f64,
                0,
            ) as i64
        };

        MapStats {
            wins: self.wins,
            losses: self.losses,
            played: self.played,
            win_rate: ratio(self.wins, self.played),
            avg_frag_diff,
        }
    }
}

/// Win rate and average frag differential per map name for `team`.
pub fn map_stats(team: &str, maps: &[RawMapRecord]) -> BTreeMap<String, MapStats> {
    let key = normalize(team);
    let mut tallies: BTreeMap<String, MapTally> = BTreeMap::new();

    for record in maps {
        let Some(side) = record.perspective(&key) else {
            continue;
        };

        let tally = tallies.entry(record.map.clone()).or_default();
        tally.played += 1;
        tally.frags_for += side.frags_for as i64;
        tally.frags_against += side.frags_against as i64;
        match side.outcome() {
            Outcome::Win => tally.wins += 1,
            Outcome::Loss => tally.losses += 1,
            Outcome::Draw => {}
        }
    }

    tallies
        .into_iter()
        .map(|(map, tally)| (map, tally.finish()))
        .collect()
}

/// Strongest and weakest map among those played at least `min_played` times.
///
/// Ordered by win rate, then average frag differential, then name.
pub fn best_and_worst_map(
    stats: &BTreeMap<String, MapStats>,
    min_played: usize,
) -> Option<(&str, &str)> {
    let mut eligible: Vec<(&String, &MapStats)> = stats
        .iter()
        .filter(|(_, s)| s.played >= min_played.max(1))
        .collect();

    if eligible.is_empty() {
        return None;
    }

    eligible.sort_by(|(name_a, a), (name_b, b)| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.avg_frag_diff.cmp(&a.avg_frag_diff))
            .then(name_a.cmp(name_b))
    });

    let best = eligible.first()?.0.as_str();
    let worst = eligible.last()?.0.as_str();
    Some((best, worst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_stats() {
        let maps = vec![
            RawMapRecord::new("Alpha", "Beta", 10, 5, "dm3", "2024-01-01"),
            RawMapRecord::new("Gamma", "alpha", 12, 8, "dm3", "2024-01-02"),
            RawMapRecord::new("ALPHA", "Delta", 6, 6, "dm6", "2024-01-03"),
            RawMapRecord::new("Beta", "Gamma", 30, 0, "dm6", "2024-01-04"),
        ];

        let stats = map_stats("alpha", &maps);
        assert_eq!(stats.len(), 2);

        let dm3 = &stats["dm3"];
        assert_eq!(dm3.played, 2);
        assert_eq!(dm3.wins, 1);
        assert_eq!(dm3.losses, 1);
        assert_eq!(dm3.win_rate, 0.5);
        // (18 - 17) / 2 = 0.5 rounds up
        assert_eq!(dm3.avg_frag_diff, 1);

        let dm6 = &stats["dm6"];
        assert_eq!(dm6.played, 1);
        assert_eq!(dm6.wins + dm6.losses, 0);
        assert_eq!(dm6.win_rate, 0.0);
    }

    #[test]
    fn test_negative_half_rounds_up() {
        let maps = vec![
            RawMapRecord::new("Alpha", "Beta", 5, 10, "dm3", "2024-01-01"),
            RawMapRecord::new("Alpha", "Beta", 10, 10, "dm3", "2024-01-02"),
        ];
        assert_eq!(map_stats("Alpha", &maps)["dm3"].avg_frag_diff, -2);
    }

    #[test]
    fn test_no_matching_maps() {
        let maps = vec![RawMapRecord::new("Beta", "Gamma", 1, 0, "dm3", "2024-01-01")];
        assert!(map_stats("Alpha", &maps).is_empty());
        assert!(map_stats("Alpha", &[]).is_empty());
    }

    #[test]
    fn test_best_and_worst_map() {
        let maps = vec![
            RawMapRecord::new("Alpha", "Beta", 10, 5, "dm3", "2024-01-01"),
            RawMapRecord::new("Alpha", "Beta", 10, 5, "dm3", "2024-01-02"),
            RawMapRecord::new("Alpha", "Beta", 1, 5, "dm6", "2024-01-03"),
            RawMapRecord::new("Alpha", "Beta", 1, 5, "dm6", "2024-01-04"),
            RawMapRecord::new("Alpha", "Beta", 9, 5, "e1m2", "2024-01-05"),
        ];
        let stats = map_stats("Alpha", &maps);

        assert_eq!(best_and_worst_map(&stats, 2), Some(("dm3", "dm6")));
        assert_eq!(best_and_worst_map(&stats, 3), None);
    }
}
