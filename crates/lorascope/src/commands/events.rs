//! Event command handlers.

use owo_colors::OwoColorize;
use tabled::Tabled;

use lorascope_core::chart::RfMetric;
use lorascope_core::table::PLACEHOLDER;
use lorascope_core::view::{DeviceFilter, EventTypeFilter, FilterState};
use lorascope_core::{
    AggregateStats, Controller, EventQuery, EventRow, EventTag, EventType, RfChartData, RfSample,
};

use crate::cli::{EventFilterArgs, EventsArgs, EventsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventListRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    event_type: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "RSSI")]
    rssi: String,
    #[tabled(rename = "SNR")]
    snr: String,
}

#[derive(Tabled)]
struct WideEventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    event_type: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "DevEUI")]
    dev_eui: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "F-Port")]
    f_port: String,
    #[tabled(rename = "RSSI")]
    rssi: String,
    #[tabled(rename = "SNR")]
    snr: String,
}

#[derive(Tabled)]
struct RfSampleRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "RSSI (dBm)")]
    rssi: String,
    #[tabled(rename = "SNR (dB)")]
    snr: String,
    #[tabled(rename = "Freq (MHz)")]
    frequency: String,
    #[tabled(rename = "DR")]
    dr: String,
}

impl From<&RfSample> for RfSampleRow {
    fn from(s: &RfSample) -> Self {
        Self {
            time: s.time_label.clone(),
            rssi: fmt_opt(s.rssi.map(|v| v.to_string())),
            snr: fmt_opt(s.snr.map(|v| format!("{v:.1}"))),
            frequency: fmt_opt(s.frequency_mhz.map(|v| format!("{v:.3}"))),
            dr: fmt_opt(s.dr.map(|v| v.to_string())),
        }
    }
}

fn fmt_opt(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.to_owned())
}

/// Badge text for the type column, colored by event kind.
fn type_badge(row: &EventRow, color: bool) -> String {
    if !color {
        return row.event_type.clone();
    }
    match row.tag {
        EventTag::Uplink => row.event_type.green().to_string(),
        EventTag::Join => row.event_type.blue().to_string(),
        EventTag::Log => row.event_type.yellow().to_string(),
        EventTag::Ack => row.event_type.cyan().to_string(),
        EventTag::Neutral => row.event_type.dimmed().to_string(),
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn to_query(filter: &EventFilterArgs) -> EventQuery {
    FilterState {
        device: filter
            .device
            .clone()
            .map_or(DeviceFilter::All, DeviceFilter::Device),
        event_type: filter
            .event_type
            .as_deref()
            .map_or(EventTypeFilter::All, |t| {
                EventTypeFilter::Only(EventType::from(t))
            }),
        limit: filter.limit,
    }
    .to_query()
}

fn stats_detail(stats: &AggregateStats) -> String {
    let mut lines = vec![
        format!("Total events:   {}", stats.total_events),
        format!("Unique devices: {}", stats.unique_devices),
        format!(
            "Latest event:   {}",
            stats.latest_event.as_deref().unwrap_or(PLACEHOLDER)
        ),
    ];
    if !stats.events_by_type.is_empty() {
        lines.push("By type:".into());
        for (ty, count) in &stats.events_by_type {
            lines.push(format!("  {:<6} {count}", ty.to_uppercase()));
        }
    }
    lines.join("\n")
}

fn rf_detail(chart: &RfChartData) -> String {
    let mut lines = vec![format!("Uplink samples: {}", chart.samples.len())];
    for metric in RfMetric::ALL {
        let domain = chart.domain(metric);
        lines.push(format!(
            "{:<10} axis {:.2} .. {:.2}{}",
            metric.name(),
            domain.min,
            domain.max,
            metric.unit(),
        ));
    }
    let labels = chart.time_axis_labels();
    if !labels.is_empty() {
        lines.push(format!("Time axis:  {}", labels.join("  |  ")));
    }
    let rows: Vec<RfSampleRow> = chart.samples.iter().map(RfSampleRow::from).collect();
    lines.push(output::render_table(&rows));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List { filter, wide } => {
            let events = controller.list_events(&to_query(&filter)).await?;

            if matches!(global.output, OutputFormat::Table) && events.is_empty() {
                eprintln!("No events found");
                return Ok(());
            }

            let color = output::should_color(&global.color);
            let out = if wide {
                output::render_list(
                    &global.output,
                    &events,
                    |e| {
                        let row = EventRow::from_event(e, false);
                        WideEventRow {
                            event_type: type_badge(&row, color),
                            id: row.id,
                            device: row.device_name,
                            dev_eui: row.dev_eui,
                            time: row.event_time,
                            f_port: row.f_port,
                            rssi: row.rssi,
                            snr: row.snr,
                        }
                    },
                    |e| e.id.to_string(),
                )
            } else {
                output::render_list(
                    &global.output,
                    &events,
                    |e| {
                        let row = EventRow::from_event(e, false);
                        EventListRow {
                            event_type: type_badge(&row, color),
                            id: row.id,
                            device: row.device_name,
                            time: row.event_time,
                            rssi: row.rssi,
                            snr: row.snr,
                        }
                    },
                    |e| e.id.to_string(),
                )
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Stats => {
            let stats = controller.event_stats().await?;
            let out = output::render_single(&global.output, &stats, stats_detail, |s| {
                s.total_events.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Rf { filter } => {
            let events = controller.list_events(&to_query(&filter)).await?;
            let Some(chart) = RfChartData::from_events(&events) else {
                eprintln!("No uplink radio data in the selected events");
                return Ok(());
            };
            let out = output::render_single(&global.output, &chart, rf_detail, |c| {
                c.samples
                    .iter()
                    .map(|s| s.event_id.to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lorascope_core::Event;
    use lorascope_core::view::ResultLimit;

    #[test]
    fn filter_flags_become_query_params() {
        let query = to_query(&EventFilterArgs {
            device: Some("a84041000181c4b1".into()),
            event_type: Some("UPLINK".into()),
            limit: ResultLimit::L500,
        });
        assert_eq!(query.dev_eui.as_deref(), Some("a84041000181c4b1"));
        assert_eq!(query.event_type.as_deref(), Some("up"));
        assert_eq!(query.limit, 500);
    }

    #[test]
    fn stats_detail_lists_types_uppercased() {
        let mut stats = AggregateStats {
            total_events: 12,
            unique_devices: 3,
            ..AggregateStats::default()
        };
        stats.events_by_type.insert("up".into(), 10);
        stats.events_by_type.insert("join".into(), 2);
        let text = stats_detail(&stats);
        assert!(text.contains("Total events:   12"));
        assert!(text.contains("UP"));
        assert!(text.contains(&format!("Latest event:   {PLACEHOLDER}")));
    }

    #[test]
    fn rf_detail_units_follow_values_with_one_space() {
        let event = Event {
            id: 1,
            event_type: EventType::Uplink,
            dev_eui: "a84041000181c4b1".into(),
            device_name: Some("estufa-01".into()),
            event_time: "2025-03-01T10:00:00".into(),
            received_at: "2025-03-01T10:00:01".into(),
            f_port: Some(2),
            rssi: Some(-97),
            snr: Some(7.5),
            frequency: Some(916_800_000),
            dr: Some(3),
        };
        let chart = RfChartData::from_events(&[event]).unwrap();
        let text = rf_detail(&chart);
        let rssi = text.lines().find(|l| l.starts_with("RSSI")).unwrap();
        assert!(rssi.ends_with(" dBm"));
        assert!(!rssi.contains("  dBm"));
        let data_rate = text.lines().find(|l| l.starts_with("Data Rate")).unwrap();
        assert!(data_rate.chars().last().is_some_and(|c| c.is_ascii_digit()));
    }
}
