// ── Unified domain model ──
//
// Every type in this module is the canonical representation of something
// the sensor backend reports. Consumers (CLI/TUI) depend on these, never
// on the raw wire types in `lorascope_api::types`.

pub mod analysis;
pub mod device;
pub mod event;
pub mod timestamp;

// ── Re-exports ──────────────────────────────────────────────────────

pub use analysis::{
    AnalysisKind, AnalysisOutcome, AnalysisParams, AnalysisResult, ClassThresholds,
    ClassificationResult, ClusterStat, ClusteringResult, PredictionPoint, PredictionResult,
    TargetField, TimeRange,
};
pub use device::{AggregateStats, DeviceSummary};
pub use event::{Event, EventType};
pub use timestamp::parse_timestamp;
