//! In-memory response cache with per-entry time-to-live.
//!
//! Two tiers are kept side by side:
//! - List tier: short TTL for match listings, which are polled often
//! - Detail tier: longer TTL for per-event details and statistics
//!
//! Expiry is checked lazily when an entry is read. Each tier is also bounded
//! by an LRU capacity so entries nobody reads again cannot grow without limit.

use lru::LruCache;
use serde_json::Value;
use std::{
    collections::HashMap,
    fmt,
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use super::clock::{Clock, SystemClock};

/// Which cache tier a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTier {
    List,
    Detail,
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTier::List => write!(f, "list"),
            CacheTier::Detail => write!(f, "detail"),
        }
    }
}

/// Logical identity of a request, independent of headers or timing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Matches {
        limit: Option<usize>,
        live_only: bool,
    },
    EventDetails {
        event_id: String,
    },
    EventStatistics {
        event_id: String,
    },
}

impl RequestKey {
    /// String form used as the cache map key.
    pub fn cache_key(&self) -> String {
        match self {
            RequestKey::Matches { limit, live_only } => format!(
                "matches_{}_{}",
                limit
                    .map(|l| format!("l{}", l))
                    .unwrap_or_else(|| "all".to_string()),
                if *live_only { "live" } else { "any" }
            ),
            RequestKey::EventDetails { event_id } => format!("event_details_{}", event_id),
            RequestKey::EventStatistics { event_id } => format!("event_stats_{}", event_id),
        }
    }

    pub fn tier(&self) -> CacheTier {
        match self {
            RequestKey::Matches { .. } => CacheTier::List,
            RequestKey::EventDetails { .. } | RequestKey::EventStatistics { .. } => {
                CacheTier::Detail
            }
        }
    }
}

/// A stored payload and the moment it was written.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub value: Value,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    /// Servable iff `now - stored_at < ttl`.
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.age(now) < self.ttl
    }
}

/// One TTL cache tier.
pub struct TtlCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    default_ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(default_ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(default_ttl, capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(default_ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            default_ttl,
            capacity,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Fresh value for `key`, or `None` on a miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_with_age(key).map(|(value, _)| value)
    }

    /// Fresh value for `key` together with its age. Expired entries are evicted.
    pub fn get_with_age(&self, key: &str) -> Option<(Value, Duration)> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let fresh = entries.peek(key)?.is_fresh(now);
        if !fresh {
            entries.pop(key);
            return None;
        }

        entries
            .get(key)
            .map(|entry| (entry.value.clone(), entry.age(now)))
    }

    /// Store or overwrite `key`, timestamped now.
    pub fn put(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        let key = key.into();
        let entry = CacheEntry {
            key: key.clone(),
            value,
            stored_at: self.clock.now(),
            ttl,
        };
        self.lock().put(key, entry);
    }

    /// Store with this tier's default TTL.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.put(key, value, self.default_ttl);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries still servable right now.
    pub fn live_len(&self) -> usize {
        let now = self.clock.now();
        self.lock()
            .iter()
            .filter(|(_, entry)| entry.is_fresh(now))
            .count()
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("default_ttl", &self.default_ttl)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

/// Both cache tiers owned by a client.
#[derive(Debug)]
pub struct CacheStore {
    pub list: TtlCache,
    pub detail: TtlCache,
}

impl CacheStore {
    pub fn new(
        list_ttl: Duration,
        detail_ttl: Duration,
        capacity: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            list: TtlCache::with_clock(list_ttl, capacity, clock.clone()),
            detail: TtlCache::with_clock(detail_ttl, capacity, clock),
        }
    }

    pub fn tier(&self, tier: CacheTier) -> &TtlCache {
        match tier {
            CacheTier::List => &self.list,
            CacheTier::Detail => &self.detail,
        }
    }

    pub fn lookup(&self, key: &RequestKey) -> Option<(Value, Duration)> {
        self.tier(key.tier()).get_with_age(&key.cache_key())
    }

    /// Store under the tier and default TTL the key belongs to.
    pub fn store(&self, key: &RequestKey, value: Value) {
        self.tier(key.tier()).insert(key.cache_key(), value);
    }

    pub fn clear_all(&self) {
        self.list.clear();
        self.detail.clear();
    }

    /// `(live entries, capacity)` per tier.
    pub fn stats(&self) -> HashMap<CacheTier, (usize, usize)> {
        let mut stats = HashMap::new();
        stats.insert(
            CacheTier::List,
            (self.list.live_len(), self.list.capacity()),
        );
        stats.insert(
            CacheTier::Detail,
            (self.detail.live_len(), self.detail.capacity()),
        );
        stats
    }
}
