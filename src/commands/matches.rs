//! Match listing command implementation

use serde_json::Value;

use crate::{
    sports::{FetchOptions, SportsClient},
    Result,
};

use super::{display_field, print_json, report_cache_status};

/// Main 1X2 odds (home, draw, away) from market type 1, if listed.
pub fn main_odds(event: &Value) -> Option<(String, String, String)> {
    let market = event
        .get("m")?
        .as_array()?
        .iter()
        .find(|m| m.get("t").and_then(Value::as_i64) == Some(1))?;

    let mut home = "-".to_string();
    let mut draw = "-".to_string();
    let mut away = "-".to_string();
    for odd in market.get("o")?.as_array()? {
        let value = display_field(odd.get("odd"));
        match odd.get("no").and_then(Value::as_i64) {
            Some(1) => home = value,
            Some(0) => draw = value,
            Some(2) => away = value,
            _ => {}
        }
    }
    Some((home, draw, away))
}

/// `LIVE Home vs Away (time) | ID: n | Odds: h - d - a`
pub fn format_match_summary(event: &Value) -> String {
    let status = if event.get("il").and_then(Value::as_bool) == Some(true) {
        "LIVE"
    } else {
        "Scheduled"
    };
    let odds = main_odds(event)
        .map(|(h, d, a)| format!(" | Odds: {} - {} - {}", h, d, a))
        .unwrap_or_default();

    format!(
        "{} {} vs {} ({}) | ID: {}{}",
        status,
        display_field(event.get("hn")),
        display_field(event.get("an")),
        display_field(event.get("d")),
        display_field(event.get("i")),
        odds
    )
}

/// Handle the matches command
pub async fn handle_matches(
    client: &SportsClient,
    limit: usize,
    live_only: bool,
    as_json: bool,
    options: FetchOptions,
) -> Result<()> {
    eprintln!(
        "Fetching sports matches (limit: {}, live only: {})...",
        limit, live_only
    );

    let fetched = client
        .get_matches_with(Some(limit), live_only, options)
        .await?;

    if as_json {
        return print_json(&Value::Array(fetched.value));
    }

    report_cache_status(fetched.cache);
    println!("Retrieved {} matches", fetched.value.len());
    println!();
    for (i, event) in fetched.value.iter().enumerate() {
        println!("{:2}. {}", i + 1, format_match_summary(event));
    }
    println!();
    println!("Use `details <event_id>` for full odds or `stats <event_id>` for statistics");

    Ok(())
}
