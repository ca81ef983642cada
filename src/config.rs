//! Client configuration.
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file) and are validated once. A [`ClientConfig`] is never mutated after the
//! client that owns it has been built.

use reqwest::{header::HeaderValue, Url};
use std::{collections::HashMap, path::Path, str::FromStr, time::Duration};

use crate::{core::rate_limit::Jitter, Result, SportsError};

pub const SPORTS_API_BASE_URL_ENV_VAR: &str = "SPORTS_API_BASE_URL";
pub const STATISTICS_API_BASE_URL_ENV_VAR: &str = "STATISTICS_API_BASE_URL";
pub const SPORTS_API_ENDPOINT_ENV_VAR: &str = "SPORTS_API_ENDPOINT";
pub const STATISTICS_API_PATH_ENV_VAR: &str = "STATISTICS_API_PATH";
pub const DEFAULT_TIMEOUT_ENV_VAR: &str = "DEFAULT_TIMEOUT";
pub const CACHE_DURATION_ENV_VAR: &str = "CACHE_DURATION";
pub const DETAIL_CACHE_DURATION_ENV_VAR: &str = "DETAIL_CACHE_DURATION";
pub const MIN_REQUEST_INTERVAL_ENV_VAR: &str = "MIN_REQUEST_INTERVAL";
pub const DETAIL_INTERVAL_FACTOR_ENV_VAR: &str = "DETAIL_INTERVAL_FACTOR";
pub const JITTER_MIN_MS_ENV_VAR: &str = "REQUEST_JITTER_MIN_MS";
pub const JITTER_MAX_MS_ENV_VAR: &str = "REQUEST_JITTER_MAX_MS";
pub const CACHE_CAPACITY_ENV_VAR: &str = "CACHE_CAPACITY";
pub const USER_AGENT_ENV_VAR: &str = "USER_AGENT";
pub const CHROME_VERSION_ENV_VAR: &str = "CHROME_VERSION";
pub const BROWSER_PLATFORM_ENV_VAR: &str = "BROWSER_PLATFORM";
pub const ORIGIN_URL_ENV_VAR: &str = "ORIGIN_URL";
pub const REFERER_URL_ENV_VAR: &str = "REFERER_URL";
pub const ACCEPT_LANGUAGE_ENV_VAR: &str = "ACCEPT_LANGUAGE";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Values the browser-like header set is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderProfile {
    pub user_agent: String,
    pub chrome_version: String,
    pub platform: String,
    pub origin: String,
    pub referer: String,
    pub accept_language: String,
}

impl HeaderProfile {
    pub fn full_user_agent(&self) -> String {
        format!(
            "{} (KHTML, like Gecko) Chrome/{}.0.0.0 Safari/537.36",
            self.user_agent, self.chrome_version
        )
    }
}

impl Default for HeaderProfile {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_version: "139".to_string(),
            platform: "macOS".to_string(),
            origin: "https://www.example.com".to_string(),
            referer: "https://www.example.com/".to_string(),
            accept_language: "tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub events_base_url: String,
    pub statistics_base_url: String,
    /// Listing path on the events API, e.g. `/sports/events`.
    pub events_path: String,
    /// Statistics path prefix; the event id is appended as the last segment.
    pub statistics_path: String,
    /// Fixed query parameters sent with every listing request.
    pub list_params: Vec<(String, String)>,
    pub timeout: Duration,
    pub cache_duration: Duration,
    pub detail_cache_duration: Duration,
    pub min_request_interval: Duration,
    /// Multiplier applied to `min_request_interval` for detail and statistics calls.
    pub detail_interval_factor: f64,
    pub jitter: Option<Jitter>,
    pub cache_capacity: usize,
    pub headers: HeaderProfile,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            events_base_url: "https://api-v2.example.com".to_string(),
            statistics_base_url: "https://stats-v2.example.com".to_string(),
            events_path: "/sports/events".to_string(),
            statistics_path: "/statistics/eventsummary/1".to_string(),
            list_params: vec![
                ("st".to_string(), "1".to_string()),
                ("type".to_string(), "0".to_string()),
                ("version".to_string(), "0".to_string()),
            ],
            timeout: Duration::from_secs(20),
            cache_duration: Duration::from_secs(300),
            detail_cache_duration: Duration::from_secs(600),
            min_request_interval: Duration::from_secs(2),
            detail_interval_factor: 2.0,
            jitter: Some(Jitter::new(
                Duration::from_millis(1500),
                Duration::from_millis(3000),
            )),
            cache_capacity: 256,
            headers: HeaderProfile::default(),
        }
    }
}

fn parse_var<T: FromStr>(var: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| SportsError::configuration(var, format!("cannot parse {:?}: {}", raw, e)))
}

fn seconds(var: &str, raw: &str) -> Result<Duration> {
    let secs: f64 = parse_var(var, raw)?;
    Duration::try_from_secs_f64(secs).map_err(|_| {
        SportsError::configuration(
            var,
            format!("expected a non-negative number of seconds, got {}", raw),
        )
    })
}

impl ClientConfig {
    /// Load from the process environment, reading `.env` first when present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a specific env file without touching the process environment.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let mut vars = HashMap::new();
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| SportsError::configuration(path.display().to_string(), e.to_string()))?;
        for item in iter {
            let (key, value) = item.map_err(|e| {
                SportsError::configuration(path.display().to_string(), e.to_string())
            })?;
            vars.insert(key, value);
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let list_params = ["st", "type", "version"]
            .iter()
            .zip(defaults.list_params.iter())
            .map(|(name, (_, default))| {
                let var = format!("SPORTS_API_PARAMS_{}", name.to_uppercase());
                (name.to_string(), get(&var, default))
            })
            .collect();

        let timeout = match lookup(DEFAULT_TIMEOUT_ENV_VAR) {
            Some(raw) => Duration::from_secs(parse_var(DEFAULT_TIMEOUT_ENV_VAR, &raw)?),
            None => defaults.timeout,
        };
        let cache_duration = match lookup(CACHE_DURATION_ENV_VAR) {
            Some(raw) => Duration::from_secs(parse_var(CACHE_DURATION_ENV_VAR, &raw)?),
            None => defaults.cache_duration,
        };
        let detail_cache_duration = match lookup(DETAIL_CACHE_DURATION_ENV_VAR) {
            Some(raw) => Duration::from_secs(parse_var(DETAIL_CACHE_DURATION_ENV_VAR, &raw)?),
            None => defaults.detail_cache_duration,
        };
        let min_request_interval = match lookup(MIN_REQUEST_INTERVAL_ENV_VAR) {
            Some(raw) => seconds(MIN_REQUEST_INTERVAL_ENV_VAR, &raw)?,
            None => defaults.min_request_interval,
        };
        let detail_interval_factor = match lookup(DETAIL_INTERVAL_FACTOR_ENV_VAR) {
            Some(raw) => parse_var(DETAIL_INTERVAL_FACTOR_ENV_VAR, &raw)?,
            None => defaults.detail_interval_factor,
        };
        let cache_capacity = match lookup(CACHE_CAPACITY_ENV_VAR) {
            Some(raw) => parse_var(CACHE_CAPACITY_ENV_VAR, &raw)?,
            None => defaults.cache_capacity,
        };

        let jitter = match (lookup(JITTER_MIN_MS_ENV_VAR), lookup(JITTER_MAX_MS_ENV_VAR)) {
            (None, None) => defaults.jitter,
            (min, max) => {
                let default = defaults.jitter.unwrap_or(Jitter::new(Duration::ZERO, Duration::ZERO));
                let min = match min {
                    Some(raw) => Duration::from_millis(parse_var(JITTER_MIN_MS_ENV_VAR, &raw)?),
                    None => default.min,
                };
                let max = match max {
                    Some(raw) => Duration::from_millis(parse_var(JITTER_MAX_MS_ENV_VAR, &raw)?),
                    None => default.max,
                };
                if min.is_zero() && max.is_zero() {
                    None
                } else {
                    Some(Jitter::new(min, max))
                }
            }
        };

        let header_defaults = HeaderProfile::default();
        let headers = HeaderProfile {
            user_agent: get(USER_AGENT_ENV_VAR, &header_defaults.user_agent),
            chrome_version: get(CHROME_VERSION_ENV_VAR, &header_defaults.chrome_version),
            platform: get(BROWSER_PLATFORM_ENV_VAR, &header_defaults.platform),
            origin: get(ORIGIN_URL_ENV_VAR, &header_defaults.origin),
            referer: get(REFERER_URL_ENV_VAR, &header_defaults.referer),
            accept_language: get(ACCEPT_LANGUAGE_ENV_VAR, &header_defaults.accept_language),
        };

        let config = Self {
            events_base_url: get(SPORTS_API_BASE_URL_ENV_VAR, &defaults.events_base_url),
            statistics_base_url: get(
                STATISTICS_API_BASE_URL_ENV_VAR,
                &defaults.statistics_base_url,
            ),
            events_path: get(SPORTS_API_ENDPOINT_ENV_VAR, &defaults.events_path),
            statistics_path: get(STATISTICS_API_PATH_ENV_VAR, &defaults.statistics_path),
            list_params,
            timeout,
            cache_duration,
            detail_cache_duration,
            min_request_interval,
            detail_interval_factor,
            jitter,
            cache_capacity,
            headers,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        for (var, url) in [
            (SPORTS_API_BASE_URL_ENV_VAR, &self.events_base_url),
            (STATISTICS_API_BASE_URL_ENV_VAR, &self.statistics_base_url),
        ] {
            let parsed = Url::parse(url)
                .map_err(|e| SportsError::configuration(var, format!("{}: {}", url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(SportsError::configuration(
                    var,
                    format!("unsupported scheme in {}", url),
                ));
            }
        }

        for (var, path) in [
            (SPORTS_API_ENDPOINT_ENV_VAR, &self.events_path),
            (STATISTICS_API_PATH_ENV_VAR, &self.statistics_path),
        ] {
            if !path.starts_with('/') {
                return Err(SportsError::configuration(
                    var,
                    format!("path must start with '/': {}", path),
                ));
            }
        }

        if self.timeout.is_zero() {
            return Err(SportsError::configuration(
                DEFAULT_TIMEOUT_ENV_VAR,
                "timeout must be greater than zero",
            ));
        }

        if !self.detail_interval_factor.is_finite() || self.detail_interval_factor < 1.0 {
            return Err(SportsError::configuration(
                DETAIL_INTERVAL_FACTOR_ENV_VAR,
                format!("expected a factor >= 1, got {}", self.detail_interval_factor),
            ));
        }

        let max_jitter = self.jitter.map(|j| j.max).unwrap_or_default();
        if self
            .scaled_detail_interval()
            .and_then(|interval| interval.checked_add(max_jitter))
            .is_none()
        {
            return Err(SportsError::configuration(
                MIN_REQUEST_INTERVAL_ENV_VAR,
                format!(
                    "request spacing of {:.1}s x {} plus jitter is out of range",
                    self.min_request_interval.as_secs_f64(),
                    self.detail_interval_factor
                ),
            ));
        }

        for (var, value) in [
            (USER_AGENT_ENV_VAR, &self.headers.user_agent),
            (CHROME_VERSION_ENV_VAR, &self.headers.chrome_version),
            (BROWSER_PLATFORM_ENV_VAR, &self.headers.platform),
            (ORIGIN_URL_ENV_VAR, &self.headers.origin),
            (REFERER_URL_ENV_VAR, &self.headers.referer),
            (ACCEPT_LANGUAGE_ENV_VAR, &self.headers.accept_language),
        ] {
            if HeaderValue::from_str(value).is_err() {
                return Err(SportsError::configuration(
                    var,
                    format!("not a valid header value: {:?}", value),
                ));
            }
        }

        if let Some(jitter) = self.jitter {
            if jitter.min > jitter.max {
                return Err(SportsError::configuration(
                    JITTER_MIN_MS_ENV_VAR,
                    format!(
                        "jitter minimum {}ms exceeds maximum {}ms",
                        jitter.min.as_millis(),
                        jitter.max.as_millis()
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Detail path: the listing path minus a trailing `/events`, then `/event/{id}`.
    pub fn detail_path(&self, event_id: &str) -> String {
        let prefix = self
            .events_path
            .strip_suffix("/events")
            .unwrap_or(&self.events_path);
        format!("{}/event/{}", prefix, event_id)
    }

    pub fn statistics_event_path(&self, event_id: &str) -> String {
        format!(
            "{}/{}",
            self.statistics_path.trim_end_matches('/'),
            event_id
        )
    }

    /// Spacing used before detail and statistics requests.
    ///
    /// Saturates at `Duration::MAX`; [`ClientConfig::validate`] rejects
    /// configurations that would get there.
    pub fn detail_interval(&self) -> Duration {
        self.scaled_detail_interval().unwrap_or(Duration::MAX)
    }

    fn scaled_detail_interval(&self) -> Option<Duration> {
        let factor = self.detail_interval_factor.max(1.0);
        Duration::try_from_secs_f64(self.min_request_interval.as_secs_f64() * factor).ok()
    }
}
