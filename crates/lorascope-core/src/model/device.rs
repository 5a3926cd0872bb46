// ── Device summary and aggregate counters ──

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A device seen in the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub dev_eui: String,
    pub device_name: Option<String>,
    pub event_count: u64,
}

impl DeviceSummary {
    /// Device name if known, otherwise the EUI.
    pub fn display_name(&self) -> &str {
        self.device_name.as_deref().unwrap_or(&self.dev_eui)
    }
}

/// Backend-wide counters, recomputed on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_events: u64,
    pub unique_devices: u64,
    /// Raw timestamp of the newest stored event.
    pub latest_event: Option<String>,
    /// Event count per wire event type, in backend order.
    pub events_by_type: IndexMap<String, u64>,
}
