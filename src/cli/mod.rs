//! CLI argument definitions and parsing.

use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use crate::sports::FetchOptions;

/// Flags shared by every subcommand.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output results as JSON instead of text lines.
    #[clap(long, short, global = true)]
    pub json: bool,

    /// Skip the in-memory cache and always fetch fresh data.
    #[clap(long, global = true)]
    pub no_cache: bool,

    /// Request timeout in seconds (defaults to `DEFAULT_TIMEOUT`).
    #[clap(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl OutputArgs {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            use_cache: !self.no_cache,
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Parser)]
#[clap(
    name = "sports-odds",
    about = "Fetch sports betting events, odds and statistics"
)]
pub struct SportsCli {
    #[clap(flatten)]
    pub output: OutputArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List current matches with their main 1X2 odds.
    Matches {
        /// Maximum number of matches to show (0 = all).
        #[clap(long, short, default_value_t = 10)]
        limit: usize,

        /// Show only live matches.
        #[clap(long)]
        live: bool,
    },

    /// Detailed betting markets for one event.
    Details {
        /// Event ID, e.g. 2247399.
        event_id: String,
    },

    /// Statistics and analysis for one event.
    Stats {
        /// Event ID, e.g. 2247399.
        event_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_defaults() {
        let cli = SportsCli::try_parse_from(["sports-odds", "matches"]).unwrap();

        match cli.command {
            Commands::Matches { limit, live } => {
                assert_eq!(limit, 10);
                assert!(!live);
            }
            _ => panic!("Expected Matches command"),
        }
        assert_eq!(cli.output.fetch_options(), FetchOptions::default());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = SportsCli::try_parse_from([
            "sports-odds",
            "details",
            "2247399",
            "--json",
            "--no-cache",
            "--timeout",
            "5",
        ])
        .unwrap();

        match &cli.command {
            Commands::Details { event_id } => assert_eq!(event_id, "2247399"),
            _ => panic!("Expected Details command"),
        }
        assert!(cli.output.json);
        let options = cli.output.fetch_options();
        assert!(!options.use_cache);
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_timeout_is_rejected_by_parser() {
        let result =
            SportsCli::try_parse_from(["sports-odds", "matches", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_requires_event_id() {
        assert!(SportsCli::try_parse_from(["sports-odds", "stats"]).is_err());
    }

    #[test]
    fn test_live_matches_with_limit() {
        let cli =
            SportsCli::try_parse_from(["sports-odds", "matches", "-l", "3", "--live"]).unwrap();

        match cli.command {
            Commands::Matches { limit, live } => {
                assert_eq!(limit, 3);
                assert!(live);
            }
            _ => panic!("Expected Matches command"),
        }
    }
}
