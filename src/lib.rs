//! Sports Odds Client Library
//!
//! Retrieves sports-betting events, odds and statistics from two remote HTTP
//! APIs while keeping request traffic polite and browser-shaped.
//!
//! ## Features
//!
//! - **Rate Limiting**: Minimum spacing between outbound requests, with optional jitter
//! - **Response Caching**: Two in-memory TTL tiers (match lists and per-event data)
//! - **Request Shaping**: Pluggable header strategies with a per-request transaction id
//! - **Typed Errors**: Configuration, transport and remote-response failures are distinct
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sports_odds::{ClientConfig, SportsClient};
//!
//! # async fn example() -> sports_odds::Result<()> {
//! let client = SportsClient::new(ClientConfig::from_env()?)?;
//!
//! let matches = client.get_matches(Some(10), false).await?;
//! println!("{} matches", matches.len());
//!
//! // Cached for the detail TTL unless `use_cache` is false
//! let details = client.get_event_details("2247399", true).await?;
//! println!("{}", details);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Base URLs, intervals and cache durations are read from the environment
//! (or a `.env` file):
//! ```bash
//! export SPORTS_API_BASE_URL=https://api-v2.example.com
//! export MIN_REQUEST_INTERVAL=2
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod sports;

// Re-export commonly used types
pub use config::{ClientConfig, HeaderProfile};
pub use error::{Result, SportsError};
pub use sports::{CacheStatus, FetchOptions, Fetched, SportsClient};
