// ── Event table rows ──
//
// One row per event, input order, no filtering. Empty input yields a
// single "no results" row so tables never render zero rows.

use serde::Serialize;

use crate::model::timestamp::format_or_raw;
use crate::model::{Event, EventType};

/// Placeholder for absent values.
pub const PLACEHOLDER: &str = "—";

/// Event time column format (`dd/mm/yyyy HH:MM:SS`).
pub const TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Visual tag for an event type badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventTag {
    Uplink,
    Join,
    Log,
    Ack,
    Neutral,
}

impl From<&EventType> for EventTag {
    fn from(ty: &EventType) -> Self {
        match ty {
            EventType::Uplink => Self::Uplink,
            EventType::Join => Self::Join,
            EventType::Log => Self::Log,
            EventType::Ack => Self::Ack,
            EventType::Other(_) => Self::Neutral,
        }
    }
}

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub id: String,
    /// Uppercased wire type (`UP`, `JOIN`, ...).
    pub event_type: String,
    pub tag: EventTag,
    pub dev_eui: String,
    pub device_name: String,
    pub event_time: String,
    pub f_port: String,
    pub rssi: String,
    pub snr: String,
    /// Whether the row offers a details action.
    pub details: bool,
}

impl EventRow {
    pub fn from_event(event: &Event, details: bool) -> Self {
        Self {
            id: event.id.to_string(),
            event_type: event.event_type.as_wire().to_uppercase(),
            tag: EventTag::from(&event.event_type),
            dev_eui: event.dev_eui.clone(),
            device_name: event
                .device_name
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_owned()),
            event_time: format_or_raw(&event.event_time, TIME_FORMAT),
            f_port: or_placeholder(event.f_port.map(|p| p.to_string())),
            rssi: or_placeholder(event.rssi.map(|v| format!("{v} dBm"))),
            snr: or_placeholder(event.snr.map(|v| format!("{v} dB"))),
            details,
        }
    }
}

fn or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.to_owned())
}

/// A table row: a formatted event, or the single empty-state row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum EventTableRow {
    Event(EventRow),
    NoResults,
}

/// Map `events` to table rows. `details_enabled` mirrors whether the
/// caller can handle a details action.
pub fn event_table_rows(events: &[Event], details_enabled: bool) -> Vec<EventTableRow> {
    if events.is_empty() {
        return vec![EventTableRow::NoResults];
    }
    events
        .iter()
        .map(|e| EventTableRow::Event(EventRow::from_event(e, details_enabled)))
        .collect()
}
