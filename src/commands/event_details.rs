//! Event details command implementation

use serde_json::Value;

use crate::{
    sports::{FetchOptions, SportsClient},
    Result,
};

use super::{display_field, print_json, report_cache_status};

/// Text rendering of an event's header fields and its markets.
pub fn format_event_details(event_id: &str, details: &Value) -> String {
    let rule = "=".repeat(60);
    let mut out = vec![
        rule.clone(),
        format!(
            "EVENT DETAILS - {} vs {}",
            display_field(details.get("hn")),
            display_field(details.get("an"))
        ),
        rule,
        format!("Start Time: {}", display_field(details.get("d"))),
        format!("Status: {}", display_field(details.get("s"))),
        format!("Event ID: {}", event_id),
    ];

    let markets = details
        .get("m")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    out.push(format!("Total Markets: {}", markets.len()));
    out.push(String::new());

    for market in markets {
        out.push(format!(
            "  Market {}.{} (ID: {})",
            display_field(market.get("t")),
            display_field(market.get("st")),
            display_field(market.get("i"))
        ));
        let selections = market
            .get("o")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for selection in selections {
            let name = match selection.get("n").and_then(Value::as_str) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => format!("Selection {}", display_field(selection.get("no"))),
            };
            out.push(format!(
                "    - {}: {}",
                name,
                display_field(selection.get("odd"))
            ));
        }
    }

    out.join("\n")
}

/// Handle the details command
pub async fn handle_event_details(
    client: &SportsClient,
    event_id: &str,
    as_json: bool,
    options: FetchOptions,
) -> Result<()> {
    eprintln!("Fetching detailed odds for event {}...", event_id);

    let fetched = client.get_event_details_with(event_id, options).await?;

    if as_json {
        return print_json(&fetched.value);
    }

    report_cache_status(fetched.cache);
    println!("{}", format_event_details(event_id.trim(), &fetched.value));
    Ok(())
}
