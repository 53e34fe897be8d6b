#![allow(clippy::unwrap_used)]
// Integration tests for `PanelClient` using wiremock.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fluxgate_api::{ApiError, PanelClient, UsageScope};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PanelClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = PanelClient::new(
        base_url,
        "test-token".to_string().into(),
        Duration::from_secs(5),
    )
    .unwrap();
    (server, client)
}

// ── Entity endpoints ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_nodes() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": 5, "name": "de-frankfurt-1", "address": "10.0.0.5", "status": "connected" },
        { "id": 7, "name": "nl-amsterdam-1", "status": "connecting" }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let nodes = client.list_nodes().await.unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].id, 5);
    assert_eq!(nodes[0].name, "de-frankfurt-1");
    assert_eq!(nodes[1].address, None);
}

#[tokio::test]
async fn test_list_admins() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": 1, "username": "root", "is_sudo": true },
        { "id": 2, "username": "ops" }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/admins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let admins = client.list_admins().await.unwrap();

    assert_eq!(admins.len(), 2);
    assert!(admins[0].is_sudo);
    assert!(!admins[1].is_sudo);
}

// ── Usage endpoint ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_usage_with_range() {
    let (server, client) = setup().await;

    let body = json!({
        "usages": {
            "5": [
                { "period_start": "2024-01-02T09:00:00Z", "uplink": 1024, "downlink": 2048 }
            ],
            "7": []
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/usage/nodes"))
        .and(query_param("start", "2024-01-01T10:00:00Z"))
        .and(query_param("end", "2024-01-02T10:00:00Z"))
        .and(query_param("period", "hour"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
    let usage = client
        .get_usage(UsageScope::Nodes, Some(start), end, "hour")
        .await
        .unwrap();

    assert_eq!(usage.usages.len(), 2);
    let points = &usage.usages["5"];
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].uplink, Some(1024));
    assert_eq!(points[0].downlink, Some(2048));
    assert_eq!(points[0].total, None);
}

#[tokio::test]
async fn test_get_usage_omits_start_for_unbounded_range() {
    let (server, client) = setup().await;

    // Only `end` and `period` should appear; a `start` param must not.
    Mock::given(method("GET"))
        .and(path("/api/usage/admins"))
        .and(query_param("end", "2024-01-02T10:00:00Z"))
        .and(query_param("period", "day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usages": { "-1": [{ "period_start": "2024-01-01T00:00:00Z", "total": 42 }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let end = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
    let usage = client
        .get_usage(UsageScope::Admins, None, end, "day")
        .await
        .unwrap();

    // Confirm no start param was sent by inspecting the recorded request.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.query_pairs().any(|(k, _)| k == "start"));

    assert_eq!(usage.usages["-1"][0].total, Some(42));
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let result = client.list_nodes().await;

    assert!(
        matches!(result, Err(ApiError::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admins"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let result = client.list_admins().await;

    match result {
        Err(ApiError::Api { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_nodes().await;

    match result {
        Err(ApiError::Deserialization { body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
