use crate::analysis::head_to_head::{head_to_head, HeadToHead};
use crate::analysis::map_stats::{map_stats, MapStats};
use crate::analysis::recent_form::{recent_form, RecentForm};
use crate::config::Config;
use crate::error::AppError;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use super::endpoints::Endpoint;
use super::models::{records_from_payload, roster_names};

const USER_AGENT: &str = concat!("caster_insights/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the supplementary stats service.
///
/// Each request is bounded by the configured timeout and never retried; a
/// failed lookup is reported for that endpoint alone.
pub struct StatsApiClient {
    agent: ureq::Agent,
    base_url: String,
    lookback_months: Option<u32>,
    result_limit: Option<u32>,
}

/// Result of one endpoint in a fan-out.
#[derive(Debug)]
pub struct EndpointOutcome {
    pub endpoint: Endpoint,
    pub result: Result<Value, AppError>,
}

/// One outcome per endpoint of a matchup lookup, in `Endpoint::matchup_set` order.
#[derive(Debug)]
pub struct GlobalMatchup {
    pub team_a: String,
    pub team_b: String,
    pub outcomes: Vec<EndpointOutcome>,
}

/// Cross-tournament numbers for one matchup. Absent fields mean the lookup
/// failed or returned nothing readable.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSummary {
    pub head_to_head: Option<HeadToHead>,
    pub form_a: Option<RecentForm>,
    pub form_b: Option<RecentForm>,
    pub maps_a: Option<BTreeMap<String, MapStats>>,
    pub maps_b: Option<BTreeMap<String, MapStats>>,
    pub roster_a: Option<Vec<String>>,
    pub roster_b: Option<Vec<String>>,
    pub failures: Vec<String>,
}

impl StatsApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();

        StatsApiClient {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            lookback_months: None,
            result_limit: None,
        }
    }

    /// `None` when no service URL is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let base_url = config.stats_api_url.as_deref()?;
        let mut client = StatsApiClient::new(base_url, config.stats_api_timeout);
        client.lookback_months = config.lookback_months;
        client.result_limit = config.result_limit;
        Some(client)
    }

    pub fn with_window(mut self, lookback_months: Option<u32>, result_limit: Option<u32>) -> Self {
        self.lookback_months = lookback_months;
        self.result_limit = result_limit;
        self
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    pub fn fetch(&self, endpoint: &Endpoint) -> Result<Value, AppError> {
        let url = self.url(endpoint);
        let mut request = self.agent.get(&url);
        for (key, value) in endpoint.params() {
            request = request.query(key, value);
        }
        if let Some(months) = self.lookback_months {
            request = request.query("months", &months.to_string());
        }
        if let Some(limit) = self.result_limit {
            request = request.query("limit", &limit.to_string());
        }

        match request.call() {
            Ok(resp) => resp
                .into_json::<Value>()
                .map_err(|e| AppError::JsonError(format!("{}: {}", endpoint.label(), e))),
            Err(ureq::Error::Status(code, _)) => Err(AppError::Status {
                code,
                endpoint: endpoint.label(),
            }),
            Err(e) => Err(AppError::HttpError(format!("{}: {}", endpoint.label(), e))),
        }
    }

    /// Runs every matchup lookup concurrently. A failure only affects its own
    /// endpoint; the others still complete.
    ///
    /// The lookups block on I/O, so they get a pool with one thread per
    /// endpoint instead of sharing the CPU-sized global pool.
    pub fn fetch_matchup(&self, team_a: &str, team_b: &str) -> GlobalMatchup {
        let endpoints = Endpoint::matchup_set(team_a, team_b);

        let outcomes = match rayon::ThreadPoolBuilder::new()
            .num_threads(endpoints.len())
            .build()
        {
            Ok(pool) => pool.install(|| self.fetch_all(endpoints)),
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to the global pool for stats lookups");
                self.fetch_all(endpoints)
            }
        };

        GlobalMatchup {
            team_a: team_a.trim().to_string(),
            team_b: team_b.trim().to_string(),
            outcomes,
        }
    }

    fn fetch_all(&self, endpoints: Vec<Endpoint>) -> Vec<EndpointOutcome> {
        endpoints
            .into_par_iter()
            .map(|endpoint| {
                let result = self.fetch(&endpoint);
                match &result {
                    Ok(_) => tracing::debug!(endpoint = %endpoint.label(), "Stats lookup succeeded"),
                    Err(e) => tracing::warn!(endpoint = %endpoint.label(), error = %e, "Stats lookup failed"),
                }
                EndpointOutcome { endpoint, result }
            })
            .collect()
    }
}

impl GlobalMatchup {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    fn payload(&self, endpoint: &Endpoint) -> Option<&Value> {
        self.outcomes
            .iter()
            .find(|o| &o.endpoint == endpoint)
            .and_then(|o| o.result.as_ref().ok())
    }

    /// Summarises each successful payload with the local engine.
    pub fn summary(&self, form_window: usize) -> GlobalSummary {
        let (a, b) = (self.team_a.as_str(), self.team_b.as_str());

        let matches_from = |endpoint: Endpoint| {
            self.payload(&endpoint)
                .map(records_from_payload)
                .filter(|records| !records.is_empty())
        };
        let roster_from = |endpoint: Endpoint| {
            self.payload(&endpoint)
                .map(roster_names)
                .filter(|names| !names.is_empty())
        };

        GlobalSummary {
            head_to_head: matches_from(Endpoint::head_to_head(a, b))
                .map(|records| head_to_head(a, b, &records)),
            form_a: matches_from(Endpoint::recent_form(a))
                .map(|records| recent_form(a, &records, form_window)),
            form_b: matches_from(Endpoint::recent_form(b))
                .map(|records| recent_form(b, &records, form_window)),
            maps_a: matches_from(Endpoint::map_pool(a)).map(|records| map_stats(a, &records)),
            maps_b: matches_from(Endpoint::map_pool(b)).map(|records| map_stats(b, &records)),
            roster_a: roster_from(Endpoint::roster(a)),
            roster_b: roster_from(Endpoint::roster(b)),
            failures: self
                .outcomes
                .iter()
                .filter_map(|o| o.result.as_ref().err().map(|e| e.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matchup(outcomes: Vec<(Endpoint, Result<Value, AppError>)>) -> GlobalMatchup {
        GlobalMatchup {
            team_a: "Alpha".to_string(),
            team_b: "Beta".to_string(),
            outcomes: outcomes
                .into_iter()
                .map(|(endpoint, result)| EndpointOutcome { endpoint, result })
                .collect(),
        }
    }

    #[test]
    fn test_summary_keeps_successes_alongside_failures() {
        let global = matchup(vec![
            (
                Endpoint::head_to_head("Alpha", "Beta"),
                Ok(json!({ "matches": [
                    { "team1": "beta", "team2": "alpha", "score1": 3, "score2": 9, "map": "dm3" }
                ] })),
            ),
            (
                Endpoint::recent_form("Alpha"),
                Err(AppError::HttpError("recent alpha: timed out".to_string())),
            ),
            (
                Endpoint::recent_form("Beta"),
                Ok(json!({ "games": [
                    { "team1": "Beta", "team2": "Gamma", "score1": 5, "score2": 1, "date": "2024-01-01" }
                ] })),
            ),
            (
                Endpoint::map_pool("Alpha"),
                Err(AppError::Status { code: 503, endpoint: "maps alpha".to_string() }),
            ),
            (Endpoint::map_pool("Beta"), Ok(json!({ "unexpected": true }))),
            (Endpoint::roster("Alpha"), Ok(json!(["Rocket", "Ghost"]))),
            (Endpoint::roster("Beta"), Ok(json!(null))),
        ]);

        assert_eq!(global.succeeded(), 5);

        let summary = global.summary(5);
        let h2h = summary.head_to_head.unwrap();
        assert_eq!(h2h.team_a_wins, 1);
        assert_eq!(h2h.team_a_frags, 9);

        assert!(summary.form_a.is_none());
        assert_eq!(summary.form_b.unwrap().record, "1W-0L");
        assert!(summary.maps_a.is_none());
        assert!(summary.maps_b.is_none());
        assert_eq!(summary.roster_a.unwrap(), vec!["Rocket", "Ghost"]);
        assert!(summary.roster_b.is_none());
        assert_eq!(summary.failures.len(), 2);
    }

    #[test]
    fn test_from_config_requires_url() {
        let config = Config::default();
        assert!(StatsApiClient::from_config(&config).is_none());

        let config = Config {
            stats_api_url: Some("http://stats.local/".to_string()),
            ..Config::default()
        };
        let client = StatsApiClient::from_config(&config).unwrap();
        assert_eq!(client.url(&Endpoint::roster("Alpha")), "http://stats.local/roster");
    }
}
