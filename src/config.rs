use crate::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 8;
const DEFAULT_FORM_WINDOW: usize = 5;
const DEFAULT_SPOTLIGHT_MIN_MAPS: usize = 2;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the supplementary stats service. `None` disables global lookups.
    pub stats_api_url: Option<String>,
    pub stats_api_timeout: Duration,
    pub lookback_months: Option<u32>,
    pub result_limit: Option<u32>,
    pub form_window: usize,
    pub spotlight_min_maps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stats_api_url: None,
            stats_api_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            lookback_months: None,
            result_limit: None,
            form_window: DEFAULT_FORM_WINDOW,
            spotlight_min_maps: DEFAULT_SPOTLIGHT_MIN_MAPS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let stats_api_url = env::var("STATS_API_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let timeout_secs = parse_var("STATS_API_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "STATS_API_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Config {
            stats_api_url,
            stats_api_timeout: Duration::from_secs(timeout_secs),
            lookback_months: parse_var("STATS_LOOKBACK_MONTHS")?,
            result_limit: parse_var("STATS_RESULT_LIMIT")?,
            form_window: parse_var("CASTER_FORM_WINDOW")?.unwrap_or(DEFAULT_FORM_WINDOW),
            spotlight_min_maps: parse_var("CASTER_SPOTLIGHT_MIN_MAPS")?
                .unwrap_or(DEFAULT_SPOTLIGHT_MIN_MAPS),
        })
    }
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, AppError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::ConfigError(format!("{} is not a valid number: {:?}", key, raw))),
        _ => Ok(None),
    }
}
