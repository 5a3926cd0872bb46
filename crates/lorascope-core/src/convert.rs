// ── API-to-domain type conversions ──
//
// Bridges raw `lorascope_api` response types into canonical
// `lorascope_core::model` types. Numeric radio metrics are narrowed to
// their natural ranges; values that can't be represented become `None`
// rather than a made-up default.

use lorascope_api::types::{
    AnalysisRequest, AnalysisResponse, DeviceSummaryResponse, EventResponse, EventStatsResponse,
};

use crate::model::analysis::SENSOR_DATASET;
use crate::model::{
    AggregateStats, AnalysisOutcome, AnalysisParams, AnalysisResult, DeviceSummary, Event,
    EventType,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Round a float metric into an integer type, dropping non-finite or
/// out-of-range values.
fn narrow<T: TryFrom<i64>>(raw: Option<f64>) -> Option<T> {
    let value = raw.filter(|v| v.is_finite())?.round();
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let as_int = value as i64;
    T::try_from(as_int).ok()
}

fn narrow_int<T: TryFrom<i64>>(raw: Option<i64>) -> Option<T> {
    raw.and_then(|v| T::try_from(v).ok())
}

// ── Events ─────────────────────────────────────────────────────────

impl From<EventResponse> for Event {
    fn from(raw: EventResponse) -> Self {
        Self {
            id: raw.id,
            event_type: EventType::from(raw.event_type),
            dev_eui: raw.dev_eui,
            device_name: raw.device_name,
            event_time: raw.event_time,
            received_at: raw.received_at,
            f_port: narrow_int(raw.f_port),
            rssi: narrow(raw.rssi),
            snr: raw.snr.filter(|v| v.is_finite()),
            frequency: narrow(raw.frequency),
            dr: narrow_int(raw.dr),
        }
    }
}

impl From<EventStatsResponse> for AggregateStats {
    fn from(raw: EventStatsResponse) -> Self {
        Self {
            total_events: raw.total_events,
            unique_devices: raw.unique_devices,
            latest_event: raw.latest_event,
            events_by_type: raw.events_by_type,
        }
    }
}

impl From<DeviceSummaryResponse> for DeviceSummary {
    fn from(raw: DeviceSummaryResponse) -> Self {
        Self {
            dev_eui: raw.dev_eui,
            device_name: raw.device_name,
            event_count: raw.event_count,
        }
    }
}

// ── Analysis ───────────────────────────────────────────────────────

impl From<AnalysisParams> for AnalysisRequest {
    fn from(params: AnalysisParams) -> Self {
        Self {
            dataset: SENSOR_DATASET.to_owned(),
            analysis_type: params.kind.to_string(),
            target_field: params.target.to_string(),
            time_range: params.range.to_string(),
        }
    }
}

impl From<AnalysisResponse> for AnalysisOutcome {
    fn from(raw: AnalysisResponse) -> Self {
        let result = AnalysisResult::decode(&raw.analysis_type, raw.results);
        Self {
            analysis_type: raw.analysis_type,
            target_field: raw.target_field,
            time_range: raw.time_range,
            result,
            dataset: raw.metadata.dataset,
            timestamp: raw.metadata.timestamp,
            message: raw.message,
        }
    }
}
