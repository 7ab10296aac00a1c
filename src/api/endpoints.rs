// Endpoint definitions for the supplementary stats service.
// Every lookup is keyed by the normalized team tag.

use crate::analysis::normalize;

/// One read-only query against the stats service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    HeadToHead { team: String, opponent: String },
    RecentForm { team: String },
    MapPool { team: String },
    Roster { team: String },
}

impl Endpoint {
    pub fn head_to_head(team: &str, opponent: &str) -> Self {
        Endpoint::HeadToHead {
            team: normalize(team),
            opponent: normalize(opponent),
        }
    }

    pub fn recent_form(team: &str) -> Self {
        Endpoint::RecentForm { team: normalize(team) }
    }

    pub fn map_pool(team: &str) -> Self {
        Endpoint::MapPool { team: normalize(team) }
    }

    pub fn roster(team: &str) -> Self {
        Endpoint::Roster { team: normalize(team) }
    }

    /// The seven lookups behind one matchup: head-to-head, then form, maps
    /// and roster for each side.
    pub fn matchup_set(team_a: &str, team_b: &str) -> Vec<Endpoint> {
        vec![
            Endpoint::head_to_head(team_a, team_b),
            Endpoint::recent_form(team_a),
            Endpoint::recent_form(team_b),
            Endpoint::map_pool(team_a),
            Endpoint::map_pool(team_b),
            Endpoint::roster(team_a),
            Endpoint::roster(team_b),
        ]
    }

    pub fn team(&self) -> &str {
        match self {
            Endpoint::HeadToHead { team, .. }
            | Endpoint::RecentForm { team }
            | Endpoint::MapPool { team }
            | Endpoint::Roster { team } => team,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::HeadToHead { .. } => "h2h",
            Endpoint::RecentForm { .. } => "recent",
            Endpoint::MapPool { .. } => "maps",
            Endpoint::Roster { .. } => "roster",
        }
    }

    /// Query parameters besides the lookback window and limit.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Endpoint::HeadToHead { team, opponent } => {
                vec![("team", team.as_str()), ("opponent", opponent.as_str())]
            }
            _ => vec![("team", self.team())],
        }
    }

    pub fn label(&self) -> String {
        match self {
            Endpoint::HeadToHead { team, opponent } => format!("h2h {} vs {}", team, opponent),
            other => format!("{} {}", other.path(), other.team()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matchup_set() {
        let set = Endpoint::matchup_set(" Alpha ", "BETA");
        assert_eq!(set.len(), 7);
        assert_eq!(
            set[0],
            Endpoint::HeadToHead {
                team: "alpha".to_string(),
                opponent: "beta".to_string()
            }
        );
        assert_eq!(set[6], Endpoint::Roster { team: "beta".to_string() });
    }

    #[test]
    fn test_params_and_label() {
        let h2h = Endpoint::head_to_head("Alpha", "Beta");
        assert_eq!(h2h.params(), vec![("team", "alpha"), ("opponent", "beta")]);
        assert_eq!(h2h.label(), "h2h alpha vs beta");

        let maps = Endpoint::map_pool("Alpha");
        assert_eq!(maps.path(), "maps");
        assert_eq!(maps.label(), "maps alpha");
    }
}
