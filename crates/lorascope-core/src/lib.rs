//! Domain layer between `lorascope-api` and UI consumers (CLI / TUI).
//!
//! - **[`Controller`]** — Facade over the backend client. Reads events,
//!   stats and devices, runs the concurrent three-way fetch behind the
//!   events page, and submits ML analyses.
//!
//! - **View state** ([`view`]) — [`EventsView`] and [`AnalysisView`] are
//!   explicit per-page state structs. Filter changes hand back a
//!   [`FetchTicket`]; results carry the ticket's generation so a slow,
//!   superseded fetch can't overwrite newer data.
//!
//! - **Shaping** — [`chart`] derives uplink RF samples and adaptive axis
//!   domains, [`table`] formats event rows, [`report`] formats analysis
//!   results. All pure functions of their input.
//!
//! - **Domain model** ([`model`]) — `Event`, `DeviceSummary`,
//!   `AggregateStats`, and the analysis parameter/result types.

pub mod chart;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod report;
pub mod route;
pub mod table;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{BackendConfig, TlsVerification};
pub use controller::Controller;
pub use error::CoreError;
pub use route::Route;
pub use view::{AnalysisView, EventsSnapshot, EventsView, FetchTicket};

pub use chart::{AxisDomain, RfChartData, RfMetric, RfSample};
pub use report::AnalysisReport;
pub use table::{EventRow, EventTableRow, EventTag, event_table_rows};

pub use model::{
    AggregateStats, AnalysisKind, AnalysisOutcome, AnalysisParams, AnalysisResult,
    DeviceSummary, Event, EventType, TargetField, TimeRange,
};

// Re-exported so consumers don't need a direct dependency for queries.
pub use lorascope_api::types::EventQuery;
