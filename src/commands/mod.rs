//! Command implementations for the sports odds CLI

pub mod event_details;
pub mod event_stats;
pub mod matches;

use serde_json::Value;

use crate::{sports::CacheStatus, Result};

/// Print a payload as pretty JSON on stdout.
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line note on stderr about where the data came from.
pub fn report_cache_status(status: CacheStatus) {
    match status {
        CacheStatus::Hit => eprintln!("Data served from cache"),
        CacheStatus::Miss => eprintln!("Fetched from API (cache miss)"),
        CacheStatus::Bypass => eprintln!("Fetched from API (cache disabled)"),
    }
}

/// Render a JSON scalar for display; missing or null values become `-`.
pub(crate) fn display_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) if s.is_empty() => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
