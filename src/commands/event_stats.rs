//! Event statistics command implementation

use crate::{
    sports::{FetchOptions, SportsClient},
    Result,
};

use super::{print_json, report_cache_status};

/// Handle the stats command
///
/// Statistics payloads vary per sport, so they are always printed as JSON.
pub async fn handle_event_stats(
    client: &SportsClient,
    event_id: &str,
    as_json: bool,
    options: FetchOptions,
) -> Result<()> {
    eprintln!("Fetching statistics for event {}...", event_id);

    let fetched = client.get_event_statistics_with(event_id, options).await?;

    if !as_json {
        report_cache_status(fetched.cache);
    }
    print_json(&fetched.value)
}
