//! Wire types for the sensor backend.
//!
//! Field names match the backend's snake_case JSON as-is. Values the
//! backend may omit or send as `null` are `Option`s; nothing here fills
//! in numeric defaults.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── ChirpStack events ────────────────────────────────────────────────

/// One stored ChirpStack event (`GET /chirpstack/events`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: i64,
    /// `up`, `join`, `log`, `ack`, or anything else the ingester stored.
    pub event_type: String,
    pub dev_eui: String,
    #[serde(default)]
    pub device_name: Option<String>,
    /// ISO 8601, with or without offset.
    pub event_time: String,
    pub received_at: String,
    #[serde(default)]
    pub f_port: Option<i64>,
    #[serde(default)]
    pub rssi: Option<f64>,
    #[serde(default)]
    pub snr: Option<f64>,
    /// Hz.
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub dr: Option<i64>,
}

/// Aggregate counters (`GET /chirpstack/events/stats`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStatsResponse {
    pub total_events: u64,
    pub unique_devices: u64,
    #[serde(default)]
    pub latest_event: Option<String>,
    #[serde(default)]
    pub events_by_type: IndexMap<String, u64>,
}

/// One device seen in the event log (`GET /chirpstack/devices`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummaryResponse {
    pub dev_eui: String,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub event_count: u64,
}

/// Query parameters for the event list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub limit: u32,
    pub dev_eui: Option<String>,
    pub event_type: Option<String>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            limit: 100,
            dev_eui: None,
            event_type: None,
        }
    }
}

impl EventQuery {
    /// Flatten into query-string pairs, skipping unset filters.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string())];
        if let Some(ref eui) = self.dev_eui {
            params.push(("dev_eui", eui.clone()));
        }
        if let Some(ref ty) = self.event_type {
            params.push(("event_type", ty.clone()));
        }
        params
    }
}

// ── ML analysis ──────────────────────────────────────────────────────

/// Body for `POST /ml/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub dataset: String,
    pub analysis_type: String,
    pub target_field: String,
    pub time_range: String,
}

/// Response from `POST /ml/analyze`.
///
/// `results` is kept as raw JSON; its shape depends on `analysis_type`
/// and is decoded by `lorascope-core`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis_type: String,
    pub target_field: String,
    pub time_range: String,
    #[serde(default)]
    pub results: Value,
    #[serde(default)]
    pub metadata: AnalysisMetadata,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Anything else the backend reports (row counts, model params, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_query_skips_unset_filters() {
        let query = EventQuery::default();
        assert_eq!(query.to_params(), vec![("limit", "100".to_owned())]);
    }

    #[test]
    fn event_query_includes_device_and_type() {
        let query = EventQuery {
            limit: 50,
            dev_eui: Some("a84041000181c4b1".into()),
            event_type: Some("up".into()),
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("limit", "50".to_owned()),
                ("dev_eui", "a84041000181c4b1".to_owned()),
                ("event_type", "up".to_owned()),
            ]
        );
    }

    #[test]
    fn event_decodes_with_null_metrics() {
        let raw = json!({
            "id": 7,
            "event_type": "join",
            "dev_eui": "0004a30b001c0530",
            "device_name": null,
            "event_time": "2025-03-01T12:00:00",
            "received_at": "2025-03-01T12:00:01",
            "f_port": null,
            "rssi": null,
            "snr": null,
            "frequency": null,
            "dr": null
        });
        let event: EventResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(event.event_type, "join");
        assert!(event.rssi.is_none());
        assert!(event.device_name.is_none());
    }

    #[test]
    fn stats_preserve_backend_type_order() {
        let raw = r#"{"total_events":9,"unique_devices":2,"latest_event":null,
            "events_by_type":{"up":6,"join":2,"ack":1}}"#;
        let stats: EventStatsResponse = serde_json::from_str(raw).unwrap();
        let keys: Vec<_> = stats.events_by_type.keys().map(String::as_str).collect();
        assert_eq!(keys, ["up", "join", "ack"]);
    }

    #[test]
    fn analysis_metadata_keeps_extra_fields() {
        let raw = json!({
            "analysis_type": "clustering",
            "target_field": "temperature",
            "time_range": "last_7_days",
            "results": {"n_clusters": 3},
            "metadata": {"dataset": "sensor_data", "timestamp": "2025-03-01T10:00:00", "rows": 420},
            "message": "ok"
        });
        let resp: AnalysisResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.metadata.dataset.as_deref(), Some("sensor_data"));
        assert_eq!(resp.metadata.extra.get("rows"), Some(&json!(420)));
    }
}
