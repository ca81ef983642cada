//! Request pipeline building blocks
//!
//! - `cache`: TTL cache tiers and request keys
//! - `clock`: time source shared by the limiter and the cache
//! - `http`: browser-like header synthesis
//! - `rate_limit`: minimum spacing between outbound requests

pub mod cache;
pub mod clock;
pub mod http;
pub mod rate_limit;

// Re-export commonly used items for convenience
pub use cache::{CacheEntry, CacheStore, CacheTier, RequestKey, TtlCache};
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-utils"))]
pub use clock::ManualClock;
pub use http::{BrowserHeaders, HeaderStrategy, MinimalHeaders, Operation, RequestHeaders};
pub use rate_limit::{Jitter, RateLimiter};
