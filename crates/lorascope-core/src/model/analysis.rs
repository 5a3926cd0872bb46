// ── ML analysis request/response domain types ──
//
// The backend fits the models; this side only picks parameters and
// decodes whatever result shape comes back.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::warn;

/// Dataset name the backend expects on every analysis request.
pub const SENSOR_DATASET: &str = "sensor_data";

// ── Request parameters ───────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisKind {
    #[default]
    Clustering,
    Prediction,
    Classification,
}

impl AnalysisKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Clustering => "Clustering (K-Means)",
            Self::Prediction => "Prediction (Random Forest)",
            Self::Classification => "Classification",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TargetField {
    #[default]
    Temperature,
    Humidity,
    Rssi,
    /// Water flow rate.
    Vazao,
}

impl TargetField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Rssi => "RSSI",
            Self::Vazao => "Flow rate",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum TimeRange {
    #[serde(rename = "last_24h")]
    #[strum(serialize = "last_24h")]
    Last24Hours,
    #[serde(rename = "last_7_days")]
    #[strum(serialize = "last_7_days")]
    Last7Days,
    #[default]
    #[serde(rename = "last_30_days")]
    #[strum(serialize = "last_30_days")]
    Last30Days,
    #[serde(rename = "last_90_days")]
    #[strum(serialize = "last_90_days")]
    Last90Days,
}

impl TimeRange {
    pub fn label(self) -> &'static str {
        match self {
            Self::Last24Hours => "Last 24 hours",
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::Last90Days => "Last 90 days",
        }
    }
}

/// Cycle helper for form pickers: next variant, wrapping around.
pub fn cycle_next<T: IntoEnumIterator + PartialEq + Copy>(current: T) -> T {
    let all: Vec<T> = T::iter().collect();
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    all.get((idx + 1) % all.len().max(1))
        .copied()
        .unwrap_or(current)
}

/// Cycle helper for form pickers: previous variant, wrapping around.
pub fn cycle_prev<T: IntoEnumIterator + PartialEq + Copy>(current: T) -> T {
    let all: Vec<T> = T::iter().collect();
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let prev = if idx == 0 { all.len().saturating_sub(1) } else { idx - 1 };
    all.get(prev).copied().unwrap_or(current)
}

/// The analysis form selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisParams {
    pub kind: AnalysisKind,
    pub target: TargetField,
    pub range: TimeRange,
}

// ── Results ──────────────────────────────────────────────────────────

/// K-Means clustering over one target field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringResult {
    pub n_clusters: Option<u64>,
    pub total_points: Option<u64>,
    pub cluster_centers: Vec<f64>,
    pub cluster_stats: Vec<ClusterStat>,
    pub inertia: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterStat {
    pub cluster_id: i64,
    pub count: u64,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Regression forecast of the next few hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionResult {
    pub model_score: Option<f64>,
    pub forecast_steps: Option<u64>,
    pub predictions: Vec<PredictionPoint>,
    /// Feature name to importance fraction (0.0-1.0), in backend order.
    pub feature_importance: IndexMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionPoint {
    pub step: u64,
    pub timestamp: Option<String>,
    pub predicted_value: Option<f64>,
}

/// Quartile-based low/normal/high classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationResult {
    pub class_thresholds: Option<ClassThresholds>,
    /// Class label (`baixo`, `normal`, `alto`) to count, in backend order.
    pub class_distribution: IndexMap<String, u64>,
    pub total_classified: u64,
    pub model_accuracy: Option<f64>,
    /// Per-reading classifications, kept opaque.
    pub classifications: Vec<Value>,
}

/// Band edges. Values below `low` are low, above `high` are high.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassThresholds {
    #[serde(alias = "baixo")]
    pub low: f64,
    /// Median, when reported.
    #[serde(default)]
    pub normal: Option<f64>,
    #[serde(alias = "alto")]
    pub high: f64,
}

/// Analysis result, tagged by the kind the backend declared.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "results", rename_all = "snake_case")]
pub enum AnalysisResult {
    Clustering(ClusteringResult),
    Prediction(PredictionResult),
    Classification(ClassificationResult),
    /// Unknown kind, or a payload that didn't match its declared kind.
    Other { kind: String, payload: Value },
}

impl AnalysisResult {
    /// Decode `payload` according to the declared `kind`.
    ///
    /// Never fails: an unknown kind or a payload that doesn't fit its
    /// declared shape lands in `Other` so it can still be dumped.
    pub fn decode(kind: &str, payload: Value) -> Self {
        let decoded = match kind.parse::<AnalysisKind>() {
            Ok(AnalysisKind::Clustering) => {
                serde_json::from_value(payload.clone()).map(Self::Clustering)
            }
            Ok(AnalysisKind::Prediction) => {
                serde_json::from_value(payload.clone()).map(Self::Prediction)
            }
            Ok(AnalysisKind::Classification) => {
                serde_json::from_value(payload.clone()).map(Self::Classification)
            }
            Err(_) => {
                return Self::Other {
                    kind: kind.to_owned(),
                    payload,
                };
            }
        };

        decoded.unwrap_or_else(|e| {
            warn!(kind, error = %e, "analysis payload did not match its declared kind");
            Self::Other {
                kind: kind.to_owned(),
                payload,
            }
        })
    }
}

/// A completed analysis with its echoed request fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub analysis_type: String,
    pub target_field: String,
    pub time_range: String,
    pub result: AnalysisResult,
    pub dataset: Option<String>,
    /// When the backend finished the analysis (raw timestamp).
    pub timestamp: Option<String>,
    pub message: Option<String>,
}
