//! HTTP integration tests against mocked sports and statistics APIs
//!
//! These drive the real reqwest transport to check:
//! 1. Request shape (paths, query parameters, browser headers)
//! 2. Cache behaviour as seen from the server side (request counts)
//! 3. Mapping of HTTP failures and timeouts onto typed errors

use serde_json::{json, Value};
use sports_odds::{ClientConfig, FetchOptions, SportsClient, SportsError};
use std::time::Duration;
use wiremock::{
    matchers::{header, header_exists, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn envelope(data: Value) -> Value {
    json!({ "isSuccess": true, "data": data })
}

fn listing() -> Value {
    envelope(json!({
        "events": [
            { "i": 2247399, "hn": "Galatasaray", "an": "Fenerbahce", "il": true },
            { "i": 2247400, "hn": "Besiktas", "an": "Trabzonspor", "il": false },
            { "i": 2247401, "hn": "Arsenal", "an": "Chelsea", "il": true }
        ]
    }))
}

fn config_for(events: &MockServer, stats: &MockServer) -> ClientConfig {
    ClientConfig {
        events_base_url: events.uri(),
        statistics_base_url: stats.uri(),
        min_request_interval: Duration::ZERO,
        jitter: None,
        timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn test_matches_request_shape_and_caching() {
    let events = MockServer::start().await;
    let stats = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sports/events"))
        .and(query_param("st", "1"))
        .and(query_param("type", "0"))
        .and(query_param("version", "0"))
        .and(header_exists("x-client-transaction-id"))
        .and(header_exists("x-request-timestamp"))
        .and(header("origin", "https://www.example.com"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&events)
        .await;

    let client = SportsClient::new(config_for(&events, &stats)).unwrap();

    let first = client.get_matches(Some(2), true).await.unwrap();
    let second = client.get_matches(Some(2), true).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(first[1]["hn"], json!("Arsenal"));
}

#[tokio::test]
async fn test_repeated_event_details_hit_network_once() {
    let events = MockServer::start().await;
    let stats = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sports/event/2247399"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "i": 2247399, "m": [] }))),
        )
        .expect(1)
        .mount(&events)
        .await;

    let client = SportsClient::new(config_for(&events, &stats)).unwrap();

    let first = client.get_event_details("2247399", true).await.unwrap();
    let second = client.get_event_details("2247399", true).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first["i"], json!(2247399));
}

#[tokio::test]
async fn test_uncached_event_details_always_hit_network() {
    let events = MockServer::start().await;
    let stats = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sports/event/2247399"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "i": 1 }))))
        .expect(2)
        .mount(&events)
        .await;

    let client = SportsClient::new(config_for(&events, &stats)).unwrap();

    client.get_event_details("2247399", false).await.unwrap();
    client.get_event_details("2247399", false).await.unwrap();
}

#[tokio::test]
async fn test_statistics_use_the_statistics_api() {
    let events = MockServer::start().await;
    let stats = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/statistics/eventsummary/1/2247399"))
        .and(header("sec-fetch-site", "same-site"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "standings": [], "h2h": [] }))),
        )
        .expect(1)
        .mount(&stats)
        .await;

    let client = SportsClient::new(config_for(&events, &stats)).unwrap();

    let result = client.get_event_statistics("2247399", true).await.unwrap();

    assert_eq!(result, json!({ "standings": [], "h2h": [] }));
    assert!(events.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transaction_ids_differ_between_requests() {
    let events = MockServer::start().await;
    let stats = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sports/event/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({}))))
        .mount(&events)
        .await;

    let client = SportsClient::new(config_for(&events, &stats)).unwrap();
    for _ in 0..3 {
        client
            .get_event_details_with("9", FetchOptions::fresh())
            .await
            .unwrap();
    }

    let received = events.received_requests().await.unwrap();
    let ids: std::collections::HashSet<String> = received
        .iter()
        .map(|r| {
            r.headers
                .get("x-client-transaction-id")
                .unwrap()
                .to_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_http_error_status_is_response_error() {
    let events = MockServer::start().await;
    let stats = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sports/event/404404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&events)
        .await;

    let client = SportsClient::new(config_for(&events, &stats)).unwrap();

    let err = client.get_event_details("404404", true).await.unwrap_err();

    match err {
        SportsError::Response { status, .. } => assert_eq!(status, 404),
        other => panic!("Expected Response error, got {other:?}"),
    }
    assert!(client.cache().detail.is_empty());
}

#[tokio::test]
async fn test_unsuccessful_envelope_surfaces_api_message() {
    let events = MockServer::start().await;
    let stats = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sports/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "isSuccess": false, "message": "Maintenance" })),
        )
        .mount(&events)
        .await;

    let client = SportsClient::new(config_for(&events, &stats)).unwrap();

    let err = client.get_matches(None, false).await.unwrap_err();

    assert_eq!(err.status(), Some(200));
    assert!(err.to_string().contains("Maintenance"));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let events = MockServer::start().await;
    let stats = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sports/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&events)
        .await;

    let client = SportsClient::new(config_for(&events, &stats)).unwrap();

    let err = client
        .get_matches_with(
            None,
            false,
            FetchOptions::default().with_timeout(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(client.cache().list.is_empty());
    assert!(client.rate_limiter().last_request_at().await.is_some());
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let stats = MockServer::start().await;
    let config = ClientConfig {
        events_base_url: "http://127.0.0.1:9".to_string(),
        statistics_base_url: stats.uri(),
        min_request_interval: Duration::ZERO,
        jitter: None,
        timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    };
    let client = SportsClient::new(config).unwrap();

    let err = client.get_matches(Some(1), false).await.unwrap_err();

    assert!(matches!(err, SportsError::Transport { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_client_from_env_file_config() {
    let events = MockServer::start().await;
    let stats = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sports/event/77"))
        .and(header("referer", "https://www.example.org/program"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "i": 77 }))))
        .expect(1)
        .mount(&events)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join(".env");
    std::fs::write(
        &env_path,
        format!(
            "SPORTS_API_BASE_URL={}\nSTATISTICS_API_BASE_URL={}\nSPORTS_API_ENDPOINT=/api/sports/events\nMIN_REQUEST_INTERVAL=0\nREQUEST_JITTER_MIN_MS=0\nREQUEST_JITTER_MAX_MS=0\nREFERER_URL=https://www.example.org/program\n",
            events.uri(),
            stats.uri()
        ),
    )
    .unwrap();

    let config = ClientConfig::from_env_file(&env_path).unwrap();
    let client = SportsClient::new(config).unwrap();

    let details = client.get_event_details("77", true).await.unwrap();
    assert_eq!(details["i"], json!(77));
}
