//! Dashboard screen — backend-wide counters, device list, recent events.
//!
//! Layout:
//! ┌─ Dashboard ───────────────────────────────────────────────────────┐
//! │ ┌ Events ──┐ ┌ Devices ─┐ ┌ Latest event ────────┐ ┌ Types ─────┐ │
//! │ │ 1234     │ │ 12       │ │ 01/03/2025 10:00:00  │ │ 4          │ │
//! │ └──────────┘ └──────────┘ └──────────────────────┘ └────────────┘ │
//! │ ┌ Events by type ────────────┐ ┌ Devices ───────────────────────┐ │
//! │ │ UP   ██████████░░  83.3%   │ │ estufa-01   a84041…   1020    │ │
//! │ └────────────────────────────┘ └────────────────────────────────┘ │
//! ├─ Recent events ───────────────────────────────────────────────────┤
//! └───────────────────────────────────────────────────────────────────┘

use std::time::Duration;

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tracing::debug;

use lorascope_core::model::parse_timestamp;
use lorascope_core::model::timestamp::format_or_raw;
use lorascope_core::report::ProportionBar;
use lorascope_core::table::{PLACEHOLDER, TIME_FORMAT};
use lorascope_core::view::LoadingPresentation;
use lorascope_core::{AggregateStats, EventTag, EventType, EventsView, Route};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{bars, loading};

/// Rows in the recent-events strip.
const RECENT_ROWS: usize = 8;

/// `5m 30s ago` for a raw backend timestamp, keeping the two largest
/// units. `None` if the timestamp doesn't parse.
fn relative_age(raw: &str, now: DateTime<Utc>) -> Option<String> {
    let then = parse_timestamp(raw)?;
    let secs = (now - then.with_timezone(&Utc)).num_seconds();
    let Ok(secs) = u64::try_from(secs) else {
        return Some("just now".to_owned());
    };
    if secs == 0 {
        return Some("just now".to_owned());
    }
    let full = humantime::format_duration(Duration::from_secs(secs)).to_string();
    let short: Vec<&str> = full.split_whitespace().take(2).collect();
    Some(format!("{} ago", short.join(" ")))
}

/// Share of each event type in `stats`, largest first as the backend
/// reports them.
fn type_bars(stats: &AggregateStats) -> Vec<ProportionBar> {
    let total: u64 = stats.events_by_type.values().sum();
    stats
        .events_by_type
        .iter()
        .map(|(ty, &count)| {
            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            let percent = (total > 0).then(|| count as f64 / total as f64 * 100.0);
            ProportionBar {
                label: ty.to_uppercase(),
                percent,
                percent_label: percent
                    .map_or_else(|| PLACEHOLDER.to_owned(), |p| format!("{p:.1}%")),
                count: Some(count),
            }
        })
        .collect()
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_owned();
    }
    let mut out: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub struct DashboardScreen {
    view: EventsView,
    selected_device: usize,
    throbber: ThrobberState,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            view: EventsView::new(),
            selected_device: 0,
            throbber: ThrobberState::default(),
        }
    }

    fn card(frame: &mut Frame, area: Rect, title: &str, value: String, detail: Option<String>) {
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let mut lines = vec![Line::from(Span::styled(
            format!(" {value}"),
            Style::default()
                .fg(theme::NEON_CYAN)
                .add_modifier(Modifier::BOLD),
        ))];
        if let Some(detail) = detail {
            lines.push(Line::from(Span::styled(format!(" {detail}"), theme::muted())));
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let [events, devices, latest, types] = Layout::horizontal([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .areas(area);

        let stats = self.view.stats();
        let count = |v: Option<u64>| v.map_or_else(|| PLACEHOLDER.to_owned(), |n| n.to_string());

        Self::card(
            frame,
            events,
            "Events",
            count(stats.map(|s| s.total_events)),
            None,
        );
        Self::card(
            frame,
            devices,
            "Devices",
            count(stats.map(|s| s.unique_devices)),
            None,
        );

        let latest_raw = stats.and_then(|s| s.latest_event.as_deref());
        Self::card(
            frame,
            latest,
            "Latest event",
            latest_raw.map_or_else(|| PLACEHOLDER.to_owned(), |raw| format_or_raw(raw, TIME_FORMAT)),
            latest_raw.and_then(|raw| relative_age(raw, Utc::now())),
        );
        Self::card(
            frame,
            types,
            "Event types",
            count(stats.map(|s| u64::try_from(s.events_by_type.len()).unwrap_or(u64::MAX))),
            None,
        );
    }

    fn render_type_breakdown(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Events by type ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(stats) = self.view.stats() else {
            return;
        };
        let bars = type_bars(stats);
        if bars.is_empty() {
            frame.render_widget(
                Paragraph::new("  No events recorded").style(theme::muted()),
                inner,
            );
            return;
        }

        // label + percent + count take roughly 34 cells
        let track = inner.width.saturating_sub(34).max(4);
        let lines: Vec<Line> = bars
            .iter()
            .map(|bar| {
                let tag = EventTag::from(&EventType::from(bar.label.as_str()));
                bars::bar_line(bar, track, theme::tag_color(tag))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_devices(&self, frame: &mut Frame, area: Rect) {
        let devices = self.view.devices();
        let block = Block::default()
            .title(format!(" Devices ({}) ", devices.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let header = Row::new(vec![
            Cell::from("Name"),
            Cell::from("DevEUI"),
            Cell::from("Events"),
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = devices
            .iter()
            .map(|d| {
                Row::new(vec![
                    Cell::from(truncate(d.display_name(), 24)),
                    Cell::from(d.dev_eui.clone()).style(theme::muted()),
                    Cell::from(d.event_count.to_string())
                        .style(Style::default().fg(theme::NEON_CYAN)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(18),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected());

        let mut state = TableState::default();
        if !devices.is_empty() {
            state.select(Some(self.selected_device));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_recent(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Recent events ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let lines: Vec<Line> = if self.view.events().is_empty() {
            vec![Line::from(Span::styled("  No events found", theme::muted()))]
        } else {
            self.view
                .events()
                .iter()
                .take(RECENT_ROWS)
                .map(|e| {
                    let tag = EventTag::from(&e.event_type);
                    Line::from(vec![
                        Span::styled(
                            format!("  {}  ", format_or_raw(&e.event_time, TIME_FORMAT)),
                            theme::muted(),
                        ),
                        Span::styled(
                            format!("{:<5}", e.event_type.as_wire().to_uppercase()),
                            Style::default().fg(theme::tag_color(tag)),
                        ),
                        Span::styled(
                            format!(" {:<24}", truncate(e.display_name(), 24)),
                            theme::table_row(),
                        ),
                        Span::styled(
                            e.rssi.map_or_else(String::new, |v| format!(" {v} dBm")),
                            Style::default().fg(theme::NEON_CYAN),
                        ),
                        Span::styled(
                            e.snr.map_or_else(String::new, |v| format!("  {v} dB")),
                            Style::default().fg(theme::CORAL),
                        ),
                    ])
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let count = self.view.devices().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if count > 0 {
                    self.selected_device = (self.selected_device + 1).min(count - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_device = self.selected_device.saturating_sub(1);
            }
            KeyCode::Enter => {
                return Ok(self
                    .view
                    .devices()
                    .get(self.selected_device)
                    .map(|d| Action::Navigate(Route::Device(d.dev_eui.clone()))));
            }
            KeyCode::Char('r') => return Ok(Some(Action::Refresh)),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Refresh => {
                return Ok(Some(Action::FetchEvents {
                    route: Route::Dashboard,
                    ticket: self.view.refresh(),
                }));
            }
            Action::EventsLoaded {
                route: Route::Dashboard,
                generation,
                result,
            } => {
                if self.view.apply(*generation, result.clone()) {
                    let count = self.view.devices().len();
                    self.selected_device = self.selected_device.min(count.saturating_sub(1));
                } else {
                    debug!(generation, "dropped stale dashboard fetch");
                }
            }
            Action::Tick => {
                if self.view.is_loading() {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Dashboard ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let presentation = self.view.loading_presentation();
        if presentation == LoadingPresentation::FullScreen && self.view.stats().is_none() {
            loading::render_full_screen(frame, inner, &self.throbber, "Loading dashboard...");
            return;
        }

        let error_height = if self.view.error().is_some() { 3 } else { 0 };
        let [status_area, cards_area, error_area, middle_area, recent_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(error_height),
            Constraint::Min(6),
            Constraint::Length(10),
        ])
        .areas(inner);

        if presentation != LoadingPresentation::Idle {
            loading::render_updating(frame, status_area, &self.throbber);
        }
        self.render_cards(frame, cards_area);
        if let Some(message) = self.view.error() {
            loading::render_error(frame, error_area, "Failed to load dashboard", message);
        }

        let [types_area, devices_area] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(middle_area);
        self.render_type_breakdown(frame, types_area);
        self.render_devices(frame, devices_area);
        self.render_recent(frame, recent_area);
    }

    fn key_hints(&self) -> &'static str {
        "j/k device  Enter open  r refresh"
    }
}
