//! Integration tests for command handlers

use serde_json::json;
use sports_odds::{
    cli::SportsCli,
    commands::{
        event_details::handle_event_details, event_stats::handle_event_stats,
        matches::handle_matches,
    },
    ClientConfig, FetchOptions, SportsClient, SportsError,
};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> SportsClient {
    let config = ClientConfig {
        events_base_url: server.uri(),
        statistics_base_url: server.uri(),
        min_request_interval: Duration::ZERO,
        jitter: None,
        ..ClientConfig::default()
    };
    SportsClient::new(config).unwrap()
}

#[tokio::test]
async fn test_handle_matches_text_and_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sports/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isSuccess": true,
            "data": { "events": [{ "i": 1, "hn": "A", "an": "B", "il": false }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    // Second call is served from the list tier
    handle_matches(&client, 10, false, false, FetchOptions::default())
        .await
        .unwrap();
    handle_matches(&client, 10, false, true, FetchOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_handle_event_details_and_stats() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sports/event/2247399"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isSuccess": true,
            "data": { "hn": "A", "an": "B", "m": [] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/statistics/eventsummary/1/2247399"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isSuccess": true,
            "data": { "standings": [] }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    handle_event_details(&client, "2247399", false, FetchOptions::fresh())
        .await
        .unwrap();
    handle_event_stats(&client, "2247399", true, FetchOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_handler_propagates_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sports/event/5"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = handle_event_details(&client, "5", true, FetchOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), "response");
    match err {
        SportsError::Response { status, .. } => assert_eq!(status, 500),
        other => panic!("Expected Response error, got {other:?}"),
    }
}

#[test]
fn test_cli_no_cache_maps_to_fresh_fetch() {
    use clap::Parser;

    let cli =
        SportsCli::try_parse_from(["sports-odds", "--no-cache", "stats", "2247399"]).unwrap();

    assert_eq!(cli.output.fetch_options(), FetchOptions::fresh());
}
