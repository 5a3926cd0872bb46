// ── Analysis result presentation ──
//
// Turns an `AnalysisOutcome` into display-ready strings, one report
// shape per analysis kind. Matching on `AnalysisResult` is exhaustive;
// unknown kinds get a pretty-printed JSON dump.

use serde::Serialize;

use crate::model::timestamp::format_or_raw;
use crate::model::{
    AnalysisOutcome, AnalysisResult, ClassThresholds, ClassificationResult, ClusterStat,
    ClusteringResult, PredictionResult,
};
use crate::table::{PLACEHOLDER, TIME_FORMAT};

// ── Report types ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub header: ReportHeader,
    pub body: ReportBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHeader {
    pub analysis_type: String,
    pub target_field: String,
    pub time_range: String,
    pub dataset: String,
    pub completed_at: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    Clustering(ClusteringReport),
    Prediction(PredictionReport),
    Classification(ClassificationReport),
    Raw { declared_kind: String, dump: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusteringReport {
    pub total_points: String,
    pub cluster_count: String,
    pub inertia: String,
    pub clusters: Vec<ClusterCard>,
    /// `Cluster 0: 18.00`, one per center.
    pub centers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterCard {
    pub cluster_id: i64,
    pub count: u64,
    pub mean: String,
    pub std: String,
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    /// Model score as a percentage, e.g. `87.4%`.
    pub model_score: String,
    pub prediction_count: usize,
    pub predictions: Vec<PredictionLine>,
    pub feature_importance: Vec<ProportionBar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionLine {
    pub step: u64,
    pub value: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub accuracy: String,
    pub total_classified: u64,
    /// Low / normal / high, when thresholds were reported.
    pub bands: Vec<ThresholdBand>,
    pub distribution: Vec<ProportionBar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThresholdBand {
    pub label: &'static str,
    /// `< 18.50`, `18.50 - 26.25`, `> 26.25`.
    pub range: String,
}

/// A labelled horizontal bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionBar {
    pub label: String,
    /// Bar width as a percentage, clamped to `0..=100`. `None` when the
    /// proportion can't be computed (zero total).
    pub percent: Option<f64>,
    /// `42.1%`, or the placeholder when `percent` is `None`.
    pub percent_label: String,
    /// Raw count for class bars.
    pub count: Option<u64>,
}

impl ProportionBar {
    fn new(label: String, percent: Option<f64>, count: Option<u64>) -> Self {
        Self {
            label,
            percent: percent.map(|p| p.clamp(0.0, 100.0)),
            percent_label: percent.map_or_else(|| PLACEHOLDER.to_owned(), |p| format!("{p:.1}%")),
            count,
        }
    }

    /// Bar width in cells for a track `track` cells wide.
    pub fn width(&self, track: u16) -> u16 {
        let pct = self.percent.unwrap_or(0.0);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::as_conversions
        )]
        let cells = (f64::from(track) * pct / 100.0).round() as u16;
        cells.min(track)
    }
}

// ── Formatting helpers ───────────────────────────────────────────────

fn two_dp(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_owned(), |v| format!("{v:.2}"))
}

/// Fraction to percentage with one decimal. Missing reads as zero, the
/// same way the backend reports an untrained model.
fn fraction_percent(value: Option<f64>) -> String {
    format!("{:.1}%", value.unwrap_or(0.0) * 100.0)
}

/// Friendly label for the backend's class keys.
pub fn class_label(key: &str) -> String {
    match key {
        "baixo" | "low" => "Low".to_owned(),
        "normal" => "Normal".to_owned(),
        "alto" | "high" => "High".to_owned(),
        other => other.to_owned(),
    }
}

// ── Builders ─────────────────────────────────────────────────────────

impl AnalysisReport {
    pub fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        let header = ReportHeader {
            analysis_type: outcome.analysis_type.clone(),
            target_field: outcome.target_field.clone(),
            time_range: outcome.time_range.clone(),
            dataset: outcome
                .dataset
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_owned()),
            completed_at: outcome
                .timestamp
                .as_deref()
                .map_or_else(|| PLACEHOLDER.to_owned(), |t| format_or_raw(t, TIME_FORMAT)),
            message: outcome.message.clone(),
        };

        let body = match &outcome.result {
            AnalysisResult::Clustering(r) => ReportBody::Clustering(ClusteringReport::from(r)),
            AnalysisResult::Prediction(r) => ReportBody::Prediction(PredictionReport::from(r)),
            AnalysisResult::Classification(r) => {
                ReportBody::Classification(ClassificationReport::from(r))
            }
            AnalysisResult::Other { kind, payload } => ReportBody::Raw {
                declared_kind: kind.clone(),
                dump: serde_json::to_string_pretty(payload)
                    .unwrap_or_else(|_| payload.to_string()),
            },
        };

        Self { header, body }
    }
}

impl From<&ClusterStat> for ClusterCard {
    fn from(stat: &ClusterStat) -> Self {
        Self {
            cluster_id: stat.cluster_id,
            count: stat.count,
            mean: two_dp(stat.mean),
            std: two_dp(stat.std),
            min: two_dp(stat.min),
            max: two_dp(stat.max),
        }
    }
}

impl From<&ClusteringResult> for ClusteringReport {
    fn from(r: &ClusteringResult) -> Self {
        let total_points = r
            .total_points
            .or_else(|| {
                (!r.cluster_stats.is_empty()).then(|| r.cluster_stats.iter().map(|c| c.count).sum())
            })
            .map_or_else(|| PLACEHOLDER.to_owned(), |n| n.to_string());
        let cluster_count = r
            .n_clusters
            .or_else(|| u64::try_from(r.cluster_centers.len()).ok())
            .map_or_else(|| PLACEHOLDER.to_owned(), |n| n.to_string());

        Self {
            total_points,
            cluster_count,
            inertia: two_dp(r.inertia),
            clusters: r.cluster_stats.iter().map(ClusterCard::from).collect(),
            centers: r
                .cluster_centers
                .iter()
                .enumerate()
                .map(|(idx, c)| format!("Cluster {idx}: {c:.2}"))
                .collect(),
        }
    }
}

impl From<&PredictionResult> for PredictionReport {
    fn from(r: &PredictionResult) -> Self {
        Self {
            model_score: fraction_percent(r.model_score),
            prediction_count: r.predictions.len(),
            predictions: r
                .predictions
                .iter()
                .map(|p| PredictionLine {
                    step: p.step,
                    value: two_dp(p.predicted_value),
                    timestamp: p
                        .timestamp
                        .as_deref()
                        .map_or_else(|| PLACEHOLDER.to_owned(), |t| format_or_raw(t, TIME_FORMAT)),
                })
                .collect(),
            feature_importance: r
                .feature_importance
                .iter()
                .map(|(name, importance)| {
                    ProportionBar::new(name.clone(), Some(importance * 100.0), None)
                })
                .collect(),
        }
    }
}

fn threshold_bands(t: &ClassThresholds) -> Vec<ThresholdBand> {
    vec![
        ThresholdBand {
            label: "Low",
            range: format!("< {:.2}", t.low),
        },
        ThresholdBand {
            label: "Normal",
            range: format!("{:.2} - {:.2}", t.low, t.high),
        },
        ThresholdBand {
            label: "High",
            range: format!("> {:.2}", t.high),
        },
    ]
}

impl From<&ClassificationResult> for ClassificationReport {
    fn from(r: &ClassificationResult) -> Self {
        let total = r.total_classified;
        let distribution = r
            .class_distribution
            .iter()
            .map(|(key, &count)| {
                #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
                let percent = (total > 0).then(|| count as f64 / total as f64 * 100.0);
                ProportionBar::new(class_label(key), percent, Some(count))
            })
            .collect();

        Self {
            accuracy: fraction_percent(r.model_accuracy),
            total_classified: total,
            bands: r.class_thresholds.as_ref().map(threshold_bands).unwrap_or_default(),
            distribution,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::PredictionPoint;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn outcome(kind: &str, results: serde_json::Value) -> AnalysisOutcome {
        AnalysisOutcome {
            analysis_type: kind.into(),
            target_field: "temperature".into(),
            time_range: "last_30_days".into(),
            result: AnalysisResult::decode(kind, results),
            dataset: Some("sensor_data".into()),
            timestamp: Some("2025-03-01T10:00:00.512000".into()),
            message: Some("Análise concluída com sucesso".into()),
        }
    }

    #[test]
    fn classification_distribution_percentages() {
        let report = AnalysisReport::from_outcome(&outcome(
            "classification",
            json!({
                "class_thresholds": {"baixo": 18.5, "normal": 22.0, "alto": 26.25},
                "class_distribution": {"baixo": 3, "normal": 5, "alto": 2},
                "total_classified": 10,
                "model_accuracy": 0.9
            }),
        ));
        let ReportBody::Classification(c) = report.body else {
            panic!("expected classification");
        };
        let labels: Vec<&str> = c.distribution.iter().map(|b| b.percent_label.as_str()).collect();
        assert_eq!(labels, vec!["30.0%", "50.0%", "20.0%"]);
        let sum: f64 = c.distribution.iter().filter_map(|b| b.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(c.accuracy, "90.0%");
        assert_eq!(c.bands[0].range, "< 18.50");
        assert_eq!(c.bands[1].range, "18.50 - 26.25");
        assert_eq!(c.bands[2].range, "> 26.25");
        assert_eq!(c.distribution[0].label, "Low");
    }

    #[test]
    fn zero_total_skips_division() {
        let result = ClassificationResult {
            class_distribution: [("normal".to_owned(), 0)].into_iter().collect(),
            total_classified: 0,
            ..ClassificationResult::default()
        };
        let report = ClassificationReport::from(&result);
        assert_eq!(report.distribution[0].percent, None);
        assert_eq!(report.distribution[0].percent_label, PLACEHOLDER);
        assert_eq!(report.distribution[0].width(40), 0);
        assert!(report.bands.is_empty());
    }

    #[test]
    fn clustering_two_decimals_and_missing_inertia() {
        let report = AnalysisReport::from_outcome(&outcome(
            "clustering",
            json!({
                "n_clusters": 2,
                "total_points": 40,
                "cluster_centers": [18.0, 24.456],
                "cluster_stats": [
                    {"cluster_id": 0, "count": 25, "mean": 18.0, "std": 0.333, "min": 16.9, "max": 19.25},
                    {"cluster_id": 1, "count": 15, "mean": 24.456, "std": 1.0, "min": 22.0, "max": 27.0}
                ]
            }),
        ));
        let ReportBody::Clustering(c) = report.body else {
            panic!("expected clustering");
        };
        assert_eq!(c.inertia, PLACEHOLDER);
        assert_eq!(c.total_points, "40");
        assert_eq!(c.cluster_count, "2");
        assert_eq!(c.centers, vec!["Cluster 0: 18.00", "Cluster 1: 24.46"]);
        assert_eq!(c.clusters[0].std, "0.33");
        assert_eq!(c.clusters[0].max, "19.25");
    }

    #[test]
    fn prediction_score_steps_and_importance() {
        let result = PredictionResult {
            model_score: Some(0.8774),
            forecast_steps: Some(2),
            predictions: vec![
                PredictionPoint {
                    step: 1,
                    timestamp: Some("2025-03-01T11:00:00".into()),
                    predicted_value: Some(21.456),
                },
                PredictionPoint {
                    step: 2,
                    timestamp: Some("bad".into()),
                    predicted_value: Some(21.0),
                },
            ],
            feature_importance: [("lag_1".to_owned(), 0.421), ("hour".to_owned(), 0.1)]
                .into_iter()
                .collect(),
        };
        let report = PredictionReport::from(&result);
        assert_eq!(report.model_score, "87.7%");
        assert_eq!(report.prediction_count, 2);
        assert_eq!(report.predictions[0].value, "21.46");
        assert_eq!(report.predictions[0].timestamp, "01/03/2025 11:00:00");
        assert_eq!(report.predictions[1].timestamp, "bad");
        assert_eq!(report.feature_importance[0].percent_label, "42.1%");
        assert_eq!(report.feature_importance[1].width(50), 5);
    }

    #[test]
    fn unknown_kind_dumps_payload() {
        let report = AnalysisReport::from_outcome(&outcome("anomaly", json!({"score": 1})));
        let ReportBody::Raw { declared_kind, dump } = report.body else {
            panic!("expected raw dump");
        };
        assert_eq!(declared_kind, "anomaly");
        assert!(dump.contains("\"score\": 1"));
    }

    #[test]
    fn header_formats_completion_time() {
        let report = AnalysisReport::from_outcome(&outcome("anomaly", json!({})));
        assert_eq!(report.header.completed_at, "01/03/2025 10:00:00");
        assert_eq!(report.header.dataset, "sensor_data");
    }
}
