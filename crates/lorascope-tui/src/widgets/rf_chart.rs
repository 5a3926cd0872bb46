//! Uplink RF charts: one Braille line chart per metric and the
//! SNR-vs-RSSI scatter. Axis bounds come straight from the adaptive
//! domains in [`RfChartData`].

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph};

use lorascope_core::{AxisDomain, RfChartData, RfMetric};

use crate::theme;

/// Panel width from which the scatter gets its own full-height column.
const WIDE_PANEL: u16 = 120;

fn chart_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default())
}

/// Axis tick text with the precision each metric reads best at.
fn tick(metric: RfMetric, value: f64) -> String {
    match metric {
        RfMetric::Rssi | RfMetric::DataRate => format!("{value:.0}"),
        RfMetric::Snr | RfMetric::Frequency => format!("{value:.1}"),
    }
}

fn y_labels(metric: RfMetric, domain: AxisDomain) -> Vec<Span<'static>> {
    let mid = (domain.min + domain.max) / 2.0;
    [domain.min, mid, domain.max]
        .into_iter()
        .map(|v| Span::styled(tick(metric, v), theme::muted()))
        .collect()
}

/// Placeholder shown in place of the charts when no uplink carries RF data.
pub fn render_no_data(frame: &mut Frame, area: Rect) {
    let block = chart_block(" Radio metrics ".into());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new("  No uplink RF data for the selected events").style(theme::muted()),
        inner,
    );
}

/// Four metric charts plus the scatter. Wide areas get a 2×2 grid with
/// the scatter on the right; narrower ones put the scatter third in the
/// top row.
pub fn render_rf_panel(frame: &mut Frame, area: Rect, data: &RfChartData, highlight: Option<usize>) {
    let [top, bottom] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    let pair = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]);

    let (cells, scatter_area) = if area.width >= WIDE_PANEL {
        let [grid_top, scatter] =
            Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(top);
        let [grid_bottom, scatter_bottom] =
            Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(bottom);
        let [a, b] = pair.areas(grid_top);
        let [c, d] = pair.areas(grid_bottom);
        (
            [a, b, c, d],
            Rect {
                height: scatter.height + scatter_bottom.height,
                ..scatter
            },
        )
    } else {
        let [a, b, scatter] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(top);
        let [c, d] = pair.areas(bottom);
        ([a, b, c, d], scatter)
    };

    for (metric, cell) in RfMetric::ALL.into_iter().zip(cells) {
        render_metric_chart(frame, cell, data, metric, highlight);
    }
    render_scatter(frame, scatter_area, data);
}

/// Line chart of one metric over the sample sequence.
///
/// `highlight` is a sample index; its value goes into the title (the
/// terminal stand-in for a hover tooltip) and is drawn as a marker.
pub fn render_metric_chart(
    frame: &mut Frame,
    area: Rect,
    data: &RfChartData,
    metric: RfMetric,
    highlight: Option<usize>,
) {
    let series = data.series(metric);
    let domain = data.domain(metric);
    let color = theme::metric_color(metric);

    let marked: Vec<(f64, f64)> = highlight
        .and_then(|i| {
            let sample = data.samples.get(i)?;
            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            let x = i as f64;
            metric.value(sample).map(|v| (x, v))
        })
        .into_iter()
        .collect();

    let title = match marked.first() {
        Some(&(_, v)) => format!(" {}  ·  {} ", metric.name(), metric.tooltip(v)),
        None => format!(" {} ", metric.name()),
    };

    let mut datasets = vec![
        Dataset::default()
            .name(metric.name())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&series),
    ];
    if !marked.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(
                    Style::default()
                        .fg(theme::ELECTRIC_YELLOW)
                        .add_modifier(Modifier::BOLD),
                )
                .data(&marked),
        );
    }

    let x_labels: Vec<Span> = data
        .time_axis_labels()
        .into_iter()
        .map(|l| Span::styled(l.to_owned(), theme::muted()))
        .collect();

    let chart = Chart::new(datasets)
        .block(chart_block(title))
        .x_axis(
            Axis::default()
                .bounds([0.0, data.x_max()])
                .labels(x_labels)
                .style(theme::muted()),
        )
        .y_axis(
            Axis::default()
                .bounds(domain.bounds())
                .labels(y_labels(metric, domain))
                .style(theme::muted()),
        );

    frame.render_widget(chart, area);
}

/// SNR (y) against RSSI (x), sharing the time-series domains.
pub fn render_scatter(frame: &mut Frame, area: Rect, data: &RfChartData) {
    let points = data.scatter();
    let dataset = Dataset::default()
        .name("SNR vs RSSI")
        .marker(Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(theme::CORAL))
        .data(&points);

    let x_domain = data.domain(RfMetric::Rssi);
    let y_domain = data.domain(RfMetric::Snr);

    let chart = Chart::new(vec![dataset])
        .block(chart_block(" SNR vs RSSI ".into()))
        .x_axis(
            Axis::default()
                .title(Line::from(Span::styled("dBm", theme::muted())))
                .bounds(x_domain.bounds())
                .labels(y_labels(RfMetric::Rssi, x_domain))
                .style(theme::muted()),
        )
        .y_axis(
            Axis::default()
                .title(Line::from(Span::styled("dB", theme::muted())))
                .bounds(y_domain.bounds())
                .labels(y_labels(RfMetric::Snr, y_domain))
                .style(theme::muted()),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lorascope_core::{Event, EventType};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn uplink(id: i64, rssi: i32, snr: f64) -> Event {
        Event {
            id,
            event_type: EventType::Uplink,
            dev_eui: "a84041000181c4b1".into(),
            device_name: Some("estufa-01".into()),
            event_time: format!("2025-03-01T10:0{id}:00"),
            received_at: format!("2025-03-01T10:0{id}:01"),
            f_port: Some(2),
            rssi: Some(rssi),
            snr: Some(snr),
            frequency: Some(916_800_000),
            dr: Some(3),
        }
    }

    fn panel_text(width: u16) -> String {
        let data = RfChartData::from_events(&[uplink(1, -97, 7.5), uplink(2, -104, -2.0)]).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(width, 24)).unwrap();
        terminal
            .draw(|f| render_rf_panel(f, f.area(), &data, Some(0)))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn scatter_drawn_at_every_width() {
        for width in [80, 100, 119, 120, 160] {
            let text = panel_text(width);
            assert!(text.contains("SNR vs RSSI"), "scatter missing at width {width}");
            for name in ["RSSI", "SNR", "Frequency", "Data Rate"] {
                assert!(text.contains(name), "{name} chart missing at width {width}");
            }
        }
    }

    #[test]
    fn ticks_use_metric_precision() {
        assert_eq!(tick(RfMetric::Rssi, -97.4), "-97");
        assert_eq!(tick(RfMetric::Snr, 7.26), "7.3");
        assert_eq!(tick(RfMetric::Frequency, 916.8), "916.8");
    }

    #[test]
    fn y_labels_span_the_domain() {
        let labels: Vec<String> = y_labels(RfMetric::DataRate, AxisDomain::new(2.0, 6.0))
            .into_iter()
            .map(|s| s.content.into_owned())
            .collect();
        assert_eq!(labels, vec!["2", "4", "6"]);
    }
}
