#![allow(clippy::unwrap_used)]
// Integration tests for `BackendClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lorascope_api::types::{AnalysisRequest, EventQuery};
use lorascope_api::{BackendClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BackendClient) {
    let server = MockServer::start().await;
    let client = BackendClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn uplink(id: i64, time: &str, rssi: i64) -> serde_json::Value {
    json!({
        "id": id,
        "event_type": "up",
        "dev_eui": "a84041000181c4b1",
        "device_name": "greenhouse-01",
        "event_time": time,
        "received_at": time,
        "f_port": 2,
        "rssi": rssi,
        "snr": 7.5,
        "frequency": 915_200_000,
        "dr": 3
    })
}

// ── Events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_events_sends_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/chirpstack/events"))
        .and(query_param("limit", "50"))
        .and(query_param("dev_eui", "a84041000181c4b1"))
        .and(query_param("event_type", "up"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            uplink(1, "2025-03-01T10:00:00", -97),
            uplink(2, "2025-03-01T10:05:00", -101),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = EventQuery {
        limit: 50,
        dev_eui: Some("a84041000181c4b1".into()),
        event_type: Some("up".into()),
    };
    let events = client.list_events(&query).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, 1);
    assert_eq!(events[1].rssi, Some(-101.0));
    assert_eq!(events[0].device_name.as_deref(), Some("greenhouse-01"));
}

#[tokio::test]
async fn test_event_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/chirpstack/events/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_events": 1234,
            "unique_devices": 5,
            "latest_event": "2025-03-01T10:05:00",
            "events_by_type": {"up": 1200, "join": 30, "ack": 4}
        })))
        .mount(&server)
        .await;

    let stats = client.get_event_stats().await.unwrap();
    assert_eq!(stats.total_events, 1234);
    assert_eq!(stats.unique_devices, 5);
    assert_eq!(stats.events_by_type.get("join"), Some(&30));
}

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/chirpstack/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"dev_eui": "a84041000181c4b1", "device_name": "greenhouse-01", "event_count": 812},
            {"dev_eui": "0004a30b001c0530", "device_name": null, "event_count": 3}
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert!(devices[1].device_name.is_none());
    assert_eq!(devices[0].event_count, 812);
}

// ── Analysis ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_analyze_posts_request_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ml/analyze"))
        .and(body_json(json!({
            "dataset": "sensor_data",
            "analysis_type": "classification",
            "target_field": "temperature",
            "time_range": "last_30_days"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analysis_type": "classification",
            "target_field": "temperature",
            "time_range": "last_30_days",
            "results": {"total_classified": 10},
            "metadata": {"dataset": "sensor_data", "timestamp": "2025-03-01T10:00:00"},
            "message": "Análise concluída"
        })))
        .mount(&server)
        .await;

    let request = AnalysisRequest {
        dataset: "sensor_data".into(),
        analysis_type: "classification".into(),
        target_field: "temperature".into(),
        time_range: "last_30_days".into(),
    };
    let resp = client.analyze(&request).await.unwrap();

    assert_eq!(resp.analysis_type, "classification");
    assert_eq!(resp.results["total_classified"], 10);
    assert_eq!(resp.metadata.timestamp.as_deref(), Some("2025-03-01T10:00:00"));
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_backend_detail_becomes_error_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ml/analyze"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Dados insuficientes para análise"
        })))
        .mount(&server)
        .await;

    let request = AnalysisRequest {
        dataset: "sensor_data".into(),
        analysis_type: "prediction".into(),
        target_field: "vazao".into(),
        time_range: "last_24h".into(),
    };
    let result = client.analyze(&request).await;

    match result {
        Err(Error::Backend { status, detail }) => {
            assert_eq!(status, 400);
            assert_eq!(detail, "Dados insuficientes para análise");
        }
        other => panic!("expected Backend error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_error_body_is_kept() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/chirpstack/devices"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains("Bad Gateway"), "got: {err}");
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/chirpstack/events/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.get_event_stats().await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("oops")),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chirpstack/devices"))
        .and(header("authorization", "Bearer s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = TransportConfig {
        api_token: Some("s3cr3t".to_string().into()),
        ..TransportConfig::default()
    };
    let client = BackendClient::new(&server.uri(), &transport).unwrap();
    let devices = client.list_devices().await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_base_path_prefix_is_preserved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/chirpstack/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/api/v1", server.uri());
    let client = BackendClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    client.list_devices().await.unwrap();
}
