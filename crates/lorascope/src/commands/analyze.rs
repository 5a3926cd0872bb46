//! ML analysis command handler.

use std::fmt::Write as _;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use lorascope_core::report::{
    ClassificationReport, ClusteringReport, PredictionReport, ProportionBar, ReportBody,
};
use lorascope_core::{AnalysisParams, AnalysisReport, AnalysisView, Controller};

use crate::cli::{AnalyzeArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

const BAR_TRACK: u16 = 30;

fn spinner(quiet: bool) -> Option<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Processing analysis...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

// ── Text rendering ──────────────────────────────────────────────────

fn bar(b: &ProportionBar) -> String {
    let filled = usize::from(b.width(BAR_TRACK));
    let empty = usize::from(BAR_TRACK).saturating_sub(filled);
    let count = b.count.map(|c| format!(" ({c})")).unwrap_or_default();
    format!(
        "  {:<12} {}{} {}{count}",
        b.label,
        "█".repeat(filled),
        "░".repeat(empty),
        b.percent_label,
    )
}

fn clustering_text(out: &mut String, r: &ClusteringReport) {
    let _ = writeln!(out, "Total points:  {}", r.total_points);
    let _ = writeln!(out, "Clusters:      {}", r.cluster_count);
    let _ = writeln!(out, "Inertia:       {}", r.inertia);
    for card in &r.clusters {
        let _ = writeln!(out);
        let _ = writeln!(out, "Cluster {} ({} points)", card.cluster_id, card.count);
        let _ = writeln!(out, "  mean {}  std {}", card.mean, card.std);
        let _ = writeln!(out, "  min  {}  max {}", card.min, card.max);
    }
    if !r.centers.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Centers:");
        for center in &r.centers {
            let _ = writeln!(out, "  {center}");
        }
    }
}

fn prediction_text(out: &mut String, r: &PredictionReport) {
    let _ = writeln!(out, "Model score:   {}", r.model_score);
    let _ = writeln!(out, "Predictions:   {}", r.prediction_count);
    for line in &r.predictions {
        let _ = writeln!(out, "  step {:>3}  {:>10}  {}", line.step, line.value, line.timestamp);
    }
    if !r.feature_importance.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Feature importance:");
        for b in &r.feature_importance {
            let _ = writeln!(out, "{}", bar(b));
        }
    }
}

fn classification_text(out: &mut String, r: &ClassificationReport) {
    let _ = writeln!(out, "Accuracy:      {}", r.accuracy);
    let _ = writeln!(out, "Classified:    {}", r.total_classified);
    if !r.bands.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Thresholds:");
        for band in &r.bands {
            let _ = writeln!(out, "  {:<8} {}", band.label, band.range);
        }
    }
    if !r.distribution.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Distribution:");
        for b in &r.distribution {
            let _ = writeln!(out, "{}", bar(b));
        }
    }
}

fn report_text(report: &AnalysisReport) -> String {
    let h = &report.header;
    let mut out = String::new();
    let _ = writeln!(out, "Analysis:      {}", h.analysis_type);
    let _ = writeln!(out, "Target:        {}", h.target_field);
    let _ = writeln!(out, "Range:         {}", h.time_range);
    let _ = writeln!(out, "Dataset:       {}", h.dataset);
    let _ = writeln!(out, "Completed:     {}", h.completed_at);
    if let Some(ref msg) = h.message {
        let _ = writeln!(out, "Message:       {msg}");
    }
    let _ = writeln!(out);

    match &report.body {
        ReportBody::Clustering(r) => clustering_text(&mut out, r),
        ReportBody::Prediction(r) => prediction_text(&mut out, r),
        ReportBody::Classification(r) => classification_text(&mut out, r),
        ReportBody::Raw {
            declared_kind,
            dump,
        } => {
            let _ = writeln!(out, "Raw result ({declared_kind}):");
            let _ = writeln!(out, "{dump}");
        }
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: AnalyzeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut view = AnalysisView::with_params(AnalysisParams {
        kind: args.kind,
        target: args.target,
        range: args.range,
    });
    let Some(params) = view.submit() else {
        return Ok(());
    };

    let pb = spinner(global.quiet);
    let result = controller.analyze(params).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let outcome = result?;
    view.finish::<CliError>(Ok(outcome));
    let Some(report) = view.report() else {
        return Ok(());
    };

    let out = output::render_single(&global.output, report, report_text, |r| {
        r.header.analysis_type.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorascope_core::{AnalysisOutcome, AnalysisResult};
    use serde_json::json;

    fn report(kind: &str, results: serde_json::Value) -> AnalysisReport {
        AnalysisReport::from_outcome(&AnalysisOutcome {
            analysis_type: kind.into(),
            target_field: "temperature".into(),
            time_range: "last_7_days".into(),
            result: AnalysisResult::decode(kind, results),
            dataset: Some("sensor_data".into()),
            timestamp: None,
            message: Some("Análise concluída".into()),
        })
    }

    #[test]
    fn classification_text_shows_bars_and_bands() {
        let text = report_text(&report(
            "classification",
            json!({
                "class_thresholds": {"baixo": 18.5, "normal": 22.0, "alto": 26.25},
                "class_distribution": {"baixo": 1, "normal": 2, "alto": 1},
                "total_classified": 4,
                "model_accuracy": 0.9
            }),
        ));
        assert!(text.contains("Accuracy:      90.0%"));
        assert!(text.contains("Thresholds:"));
        assert!(text.contains("50.0% (2)"));
        assert!(text.contains("Message:       Análise concluída"));
    }

    #[test]
    fn unknown_kind_dumps_raw_payload() {
        let text = report_text(&report("anomaly", json!({"score": 3})));
        assert!(text.contains("Raw result (anomaly):"));
        assert!(text.contains("\"score\": 3"));
    }

    #[test]
    fn bar_width_tracks_percent() {
        let b = ProportionBar {
            label: "Normal".into(),
            percent: Some(50.0),
            percent_label: "50.0%".into(),
            count: Some(2),
        };
        let line = bar(&b);
        assert_eq!(line.matches('█').count(), 15);
        assert_eq!(line.matches('░').count(), 15);
    }
}
