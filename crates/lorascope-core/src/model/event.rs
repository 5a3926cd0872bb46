// ── ChirpStack event domain types ──

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::timestamp::parse_timestamp;

/// ChirpStack integration event kind.
///
/// The four known kinds map to the backend's wire values; anything else
/// is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Uplink,
    Join,
    Log,
    Ack,
    Other(String),
}

impl EventType {
    /// The four kinds the dashboard knows how to tag.
    pub const KNOWN: [EventType; 4] = [Self::Uplink, Self::Join, Self::Log, Self::Ack];

    /// Wire value as sent to and received from the backend.
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Uplink => "up",
            Self::Join => "join",
            Self::Log => "log",
            Self::Ack => "ack",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_uplink(&self) -> bool {
        matches!(self, Self::Uplink)
    }

    /// Human-readable description used in filter pickers.
    pub fn description(&self) -> &str {
        match self {
            Self::Uplink => "UP (Uplink)",
            Self::Join => "JOIN",
            Self::Log => "LOG",
            Self::Ack => "ACK",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for EventType {
    fn from(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "up" | "uplink" => Self::Uplink,
            "join" => Self::Join,
            "log" => Self::Log,
            "ack" => Self::Ack,
            _ => Self::Other(raw.to_owned()),
        }
    }
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<EventType> for String {
    fn from(ty: EventType) -> Self {
        match ty {
            EventType::Other(raw) => raw,
            known => known.as_wire().to_owned(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// One ChirpStack event as stored by the backend.
///
/// Radio metrics are only reported on uplinks; a missing metric is
/// `None`, never zero. Timestamps stay as the raw strings the backend
/// sent so a malformed value can still be shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub event_type: EventType,
    pub dev_eui: String,
    pub device_name: Option<String>,
    pub event_time: String,
    pub received_at: String,
    pub f_port: Option<u32>,
    /// dBm.
    pub rssi: Option<i32>,
    /// dB.
    pub snr: Option<f64>,
    /// Hz.
    pub frequency: Option<u64>,
    /// Data-rate index (0-15).
    pub dr: Option<u8>,
}

impl Event {
    /// `true` if any of RSSI, SNR, frequency or data rate is present.
    pub fn has_radio_metrics(&self) -> bool {
        self.rssi.is_some() || self.snr.is_some() || self.frequency.is_some() || self.dr.is_some()
    }

    pub fn event_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.event_time)
    }

    pub fn received_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.received_at)
    }

    /// Device name if known, otherwise the EUI.
    pub fn display_name(&self) -> &str {
        self.device_name.as_deref().unwrap_or(&self.dev_eui)
    }
}
