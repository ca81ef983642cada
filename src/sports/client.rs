//! Sports events and statistics client.
//!
//! Every public call runs through [`SportsClient::execute`]:
//! cache lookup, then on a miss rate-limit clearance, header synthesis, send,
//! validation and store. Cache-disabled calls skip the cache in both
//! directions.

use serde_json::Value;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    core::{
        cache::{CacheStore, CacheTier, RequestKey},
        clock::{Clock, SystemClock},
        http::{BrowserHeaders, HeaderStrategy, Operation},
        rate_limit::RateLimiter,
    },
    Result, SportsError,
};

use super::transport::{RawResponse, ReqwestTransport, RequestProfile, Transport};

/// Whether a result came from the cache or the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    /// Caching was disabled for the call.
    Bypass,
}

impl CacheStatus {
    pub fn hit_network(&self) -> bool {
        !matches!(self, CacheStatus::Hit)
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub use_cache: bool,
    /// Bound on the send phase; `None` uses the configured timeout.
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            timeout: None,
        }
    }
}

impl FetchOptions {
    /// Always hit the network and leave the cache untouched.
    pub fn fresh() -> Self {
        Self {
            use_cache: false,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A payload together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub cache: CacheStatus,
}

struct PendingRequest {
    key: RequestKey,
    operation: Operation,
    base_url: String,
    endpoint_path: String,
    query: Vec<(String, String)>,
    spacing: Duration,
}

pub struct SportsClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    headers: Arc<dyn HeaderStrategy>,
    limiter: Arc<RateLimiter>,
    cache: CacheStore,
}

/// Assembles a [`SportsClient`], with each collaborator replaceable.
pub struct SportsClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    headers: Option<Arc<dyn HeaderStrategy>>,
    limiter: Option<Arc<RateLimiter>>,
    clock: Arc<dyn Clock>,
}

impl SportsClientBuilder {
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn header_strategy(mut self, headers: Arc<dyn HeaderStrategy>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Share one limiter between several clients.
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Clock used by the cache and by the limiter this builder creates.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<SportsClient> {
        let config = self.config;
        config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout)?),
        };
        let headers = match self.headers {
            Some(headers) => headers,
            None => Arc::new(BrowserHeaders::new(&config.headers)?),
        };
        let limiter = self.limiter.unwrap_or_else(|| {
            Arc::new(
                RateLimiter::with_clock(config.min_request_interval, self.clock.clone())
                    .with_jitter(config.jitter),
            )
        });
        let cache = CacheStore::new(
            config.cache_duration,
            config.detail_cache_duration,
            config.cache_capacity,
            self.clock,
        );

        info!(
            events_api = %config.events_base_url,
            statistics_api = %config.statistics_base_url,
            "Sports API client initialized"
        );

        Ok(SportsClient {
            config: Arc::new(config),
            transport,
            headers,
            limiter,
            cache,
        })
    }
}

fn normalize_event_id(event_id: &str) -> Result<String> {
    let id = event_id.trim();
    if id.is_empty() {
        return Err(SportsError::InvalidArgument {
            message: "event id must not be empty".to_string(),
        });
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SportsError::InvalidArgument {
            message: format!("event id contains unsupported characters: {:?}", id),
        });
    }
    Ok(id.to_string())
}

/// Check the status line and the `{ "isSuccess": true, "data": ... }` envelope.
fn validate(response: RawResponse) -> Result<Value> {
    if !response.is_success() {
        let reason = response
            .reason
            .unwrap_or_else(|| "unexpected status".to_string());
        return Err(SportsError::response(response.status, reason));
    }

    let mut body: Value = serde_json::from_str(&response.body).map_err(|e| {
        SportsError::response(response.status, format!("malformed response body: {}", e))
    })?;

    let succeeded = body
        .get("isSuccess")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let data = body.get_mut("data").map(Value::take);

    match (succeeded, data) {
        (true, Some(data)) => Ok(data),
        _ => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("API returned unsuccessful response")
                .to_string();
            Err(SportsError::response(response.status, message))
        }
    }
}

/// Pull `events` out of a listing payload, keep live ones if asked, cap at `limit`.
fn select_matches(
    status: u16,
    data: Value,
    limit: Option<usize>,
    live_only: bool,
) -> Result<Value> {
    let events = match data {
        Value::Object(mut map) => map.remove("events"),
        _ => None,
    };
    let Some(Value::Array(events)) = events else {
        return Err(SportsError::response(
            status,
            "listing payload has no events array",
        ));
    };

    let matches: Vec<Value> = events
        .into_iter()
        .filter(|event| !live_only || event.get("il").and_then(Value::as_bool) == Some(true))
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    Ok(Value::Array(matches))
}

impl SportsClient {
    /// Client with the reqwest transport, browser headers and the system clock.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Client configured from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn builder(config: ClientConfig) -> SportsClientBuilder {
        SportsClientBuilder {
            config,
            transport: None,
            headers: None,
            limiter: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn clear_cache(&self) {
        self.cache.clear_all();
    }

    /// `(live entries, capacity)` per cache tier.
    pub fn cache_stats(&self) -> HashMap<CacheTier, (usize, usize)> {
        self.cache.stats()
    }

    /// Current matches, optionally only live ones, at most `limit` of them.
    ///
    /// A `limit` of `None` or `Some(0)` returns every event.
    pub async fn get_matches(&self, limit: Option<usize>, live_only: bool) -> Result<Vec<Value>> {
        Ok(self
            .get_matches_with(limit, live_only, FetchOptions::default())
            .await?
            .value)
    }

    pub async fn get_matches_with(
        &self,
        limit: Option<usize>,
        live_only: bool,
        options: FetchOptions,
    ) -> Result<Fetched<Vec<Value>>> {
        let limit = limit.filter(|l| *l > 0);
        let request = PendingRequest {
            key: RequestKey::Matches { limit, live_only },
            operation: Operation::ListMatches,
            base_url: self.config.events_base_url.clone(),
            endpoint_path: self.config.events_path.clone(),
            query: self.config.list_params.clone(),
            spacing: self.config.min_request_interval,
        };

        let fetched = self
            .execute(request, options, |status, data| {
                select_matches(status, data, limit, live_only)
            })
            .await?;

        Ok(Fetched {
            value: serde_json::from_value(fetched.value)?,
            cache: fetched.cache,
        })
    }

    /// Full market listing for one event.
    pub async fn get_event_details(&self, event_id: &str, use_cache: bool) -> Result<Value> {
        let options = FetchOptions {
            use_cache,
            ..FetchOptions::default()
        };
        Ok(self.get_event_details_with(event_id, options).await?.value)
    }

    pub async fn get_event_details_with(
        &self,
        event_id: &str,
        options: FetchOptions,
    ) -> Result<Fetched<Value>> {
        let event_id = normalize_event_id(event_id)?;
        let request = PendingRequest {
            operation: Operation::EventDetails,
            base_url: self.config.events_base_url.clone(),
            endpoint_path: self.config.detail_path(&event_id),
            query: Vec::new(),
            spacing: self.config.detail_interval(),
            key: RequestKey::EventDetails { event_id },
        };

        self.execute(request, options, |_, data| Ok(data)).await
    }

    /// Standings, head-to-head and related statistics for one event.
    pub async fn get_event_statistics(&self, event_id: &str, use_cache: bool) -> Result<Value> {
        let options = FetchOptions {
            use_cache,
            ..FetchOptions::default()
        };
        Ok(self
            .get_event_statistics_with(event_id, options)
            .await?
            .value)
    }

    pub async fn get_event_statistics_with(
        &self,
        event_id: &str,
        options: FetchOptions,
    ) -> Result<Fetched<Value>> {
        let event_id = normalize_event_id(event_id)?;
        let request = PendingRequest {
            operation: Operation::EventStatistics,
            base_url: self.config.statistics_base_url.clone(),
            endpoint_path: self.config.statistics_event_path(&event_id),
            query: Vec::new(),
            spacing: self.config.detail_interval(),
            key: RequestKey::EventStatistics { event_id },
        };

        self.execute(request, options, |_, data| Ok(data)).await
    }

    async fn execute<F>(
        &self,
        request: PendingRequest,
        options: FetchOptions,
        shape: F,
    ) -> Result<Fetched<Value>>
    where
        F: FnOnce(u16, Value) -> Result<Value> + Send,
    {
        if options.timeout.is_some_and(|t| t.is_zero()) {
            return Err(SportsError::InvalidArgument {
                message: "timeout must be greater than zero".to_string(),
            });
        }

        let cache_key = request.key.cache_key();

        if options.use_cache {
            if let Some((value, age)) = self.cache.lookup(&request.key) {
                debug!(
                    key = %cache_key,
                    "Using cached data (age: {:.1}s)",
                    age.as_secs_f64()
                );
                return Ok(Fetched {
                    value,
                    cache: CacheStatus::Hit,
                });
            }
            debug!(key = %cache_key, "cache miss");
        }

        self.limiter.acquire_spaced(request.spacing).await;

        let headers = self.headers.build(request.operation);
        let profile = RequestProfile {
            operation: request.operation,
            base_url: request.base_url,
            endpoint_path: request.endpoint_path,
            query: request.query,
            headers: headers.map,
            transaction_id: headers.transaction_id,
        };

        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let url = profile.url();
        info!(
            transaction_id = %profile.transaction_id,
            operation = ?profile.operation,
            "Fetching {}",
            url
        );

        let response = match tokio::time::timeout(timeout, self.transport.send(&profile, timeout))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(SportsError::timeout(format!(
                "request to {} timed out after {:.1}s",
                url,
                timeout.as_secs_f64()
            ))),
        }
        .inspect_err(|e| warn!(transaction_id = %profile.transaction_id, "request failed: {}", e))?;

        let status = response.status;
        debug!(status, "response received");

        let value = validate(response)
            .and_then(|data| shape(status, data))
            .inspect_err(|e| warn!(transaction_id = %profile.transaction_id, "rejected response: {}", e))?;

        if options.use_cache {
            self.cache.store(&request.key, value.clone());
            return Ok(Fetched {
                value,
                cache: CacheStatus::Miss,
            });
        }

        Ok(Fetched {
            value,
            cache: CacheStatus::Bypass,
        })
    }
}

impl std::fmt::Debug for SportsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SportsClient")
            .field("config", &self.config)
            .field("limiter", &self.limiter)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
