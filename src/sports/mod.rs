//! Remote sports APIs: the transport seam and the caching, rate-limited client.

pub mod client;
pub mod transport;

pub use client::{CacheStatus, FetchOptions, Fetched, SportsClient, SportsClientBuilder};
pub use transport::{RawResponse, ReqwestTransport, RequestProfile, Transport};
