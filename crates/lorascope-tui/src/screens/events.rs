//! Events screen — ChirpStack events with filters, RF charts and table.
//!
//! Also serves the per-device page: the same screen built with
//! [`EventsScreen::for_device`] pins the device filter.
//!
//! Layout:
//! ┌─ ChirpStack Events (100) ─────────────────────────────────────────┐
//! │ Device    [All]  estufa-01  estufa-02            (f toggles panel) │
//! │ Type      [All types]  Uplink  Join  Log  Ack                      │
//! │ Limit     50  [100]  200  500  1000                                │
//! │ 1234 events · 12 devices · latest 01/03/2025 10:00:00   ⠋ updating │
//! │ ┌ RSSI ─────────┐┌ SNR ──────────┐ ┌ SNR vs RSSI ─┐                │
//! │ └───────────────┘└───────────────┘ │              │                │
//! │ ┌ Frequency ────┐┌ Data Rate ────┐ │              │                │
//! │ └───────────────┘└───────────────┘ └──────────────┘                │
//! │  ID   Type  Device  DevEUI  Time  Port  RSSI  SNR                  │
//! ├─ j/k move  Enter details  f filters  r refresh ───────────────────┤
//! └───────────────────────────────────────────────────────────────────┘

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState,
};
use throbber_widgets_tui::ThrobberState;
use tracing::debug;

use lorascope_core::model::timestamp::format_or_raw;
use lorascope_core::table::{PLACEHOLDER, TIME_FORMAT};
use lorascope_core::view::{DeviceFilter, EventTypeFilter, LoadingPresentation, ResultLimit};
use lorascope_core::{
    Event, EventTableRow, EventsView, FetchTicket, RfChartData, Route, event_table_rows,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{loading, picker, rf_chart};

/// Next (or previous) entry after `current` in `choices`, wrapping.
/// `None` when `choices` is empty.
fn cycle<T: PartialEq + Clone>(choices: &[T], current: &T, forward: bool) -> Option<T> {
    let len = choices.len();
    if len == 0 {
        return None;
    }
    let idx = choices.iter().position(|c| c == current).unwrap_or(0);
    let target = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    choices.get(target).cloned()
}

pub struct EventsScreen {
    view: EventsView,
    /// Derived from the view's events whenever a fetch is applied.
    chart: Option<RfChartData>,
    /// Event shown in the details overlay.
    detail: Option<Event>,
    throbber: ThrobberState,
}

impl EventsScreen {
    pub fn new() -> Self {
        Self::with_view(EventsView::new())
    }

    /// Events page locked to one device.
    pub fn for_device(dev_eui: impl Into<String>) -> Self {
        Self::with_view(EventsView::for_device(dev_eui))
    }

    fn with_view(view: EventsView) -> Self {
        Self {
            view,
            chart: None,
            detail: None,
            throbber: ThrobberState::default(),
        }
    }

    /// Route this screen renders; fetch results are matched against it.
    pub fn route(&self) -> Route {
        match self.view.pinned_device() {
            Some(eui) => Route::Device(eui.to_owned()),
            None => Route::ChirpStackEvents,
        }
    }

    pub fn pinned_device(&self) -> Option<&str> {
        self.view.pinned_device()
    }

    fn fetch(&self, ticket: FetchTicket) -> Action {
        Action::FetchEvents {
            route: self.route(),
            ticket,
        }
    }

    fn device_choices(&self) -> Vec<DeviceFilter> {
        std::iter::once(DeviceFilter::All)
            .chain(
                self.view
                    .devices()
                    .iter()
                    .map(|d| DeviceFilter::Device(d.dev_eui.clone())),
            )
            .collect()
    }

    fn cycle_device(&mut self, forward: bool) -> Option<FetchTicket> {
        let next = cycle(
            &self.device_choices(),
            &self.view.filters().device,
            forward,
        )?;
        self.view.select_device(next)
    }

    fn cycle_event_type(&mut self, forward: bool) -> Option<FetchTicket> {
        let next = cycle(
            &EventTypeFilter::choices(),
            &self.view.filters().event_type,
            forward,
        )?;
        self.view.select_event_type(next)
    }

    fn cycle_limit(&mut self, forward: bool) -> Option<FetchTicket> {
        let next = cycle(&ResultLimit::ALL, &self.view.filters().limit, forward)?;
        self.view.select_limit(next)
    }

    /// Index of the selected event among the chart samples, if it is one.
    fn highlighted_sample(&self) -> Option<usize> {
        let chart = self.chart.as_ref()?;
        let selected = self.view.selected_event()?;
        chart
            .samples
            .iter()
            .position(|s| s.event_id == selected.id)
    }

    fn device_label(&self, dev_eui: &str) -> String {
        self.view
            .devices()
            .iter()
            .find(|d| d.dev_eui == dev_eui)
            .map_or_else(|| dev_eui.to_owned(), |d| d.display_name().to_owned())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn title(&self) -> String {
        let count = self.view.events().len();
        match self.view.pinned_device() {
            Some(eui) => format!(" Device {} ({count}) ", self.device_label(eui)),
            None => format!(" ChirpStack Events ({count}) "),
        }
    }

    fn render_filters(&self, frame: &mut Frame, area: Rect) {
        let filters = self.view.filters();

        let device_line = if let Some(eui) = self.view.pinned_device() {
            Line::from(vec![
                Span::styled(format!(" {:<10}", "Device"), theme::key_hint()),
                Span::styled(eui.to_owned(), theme::tab_active()),
                Span::styled("  (pinned)", theme::muted()),
            ])
        } else {
            let choices = self.device_choices();
            let labels: Vec<String> = choices
                .iter()
                .map(|c| match c {
                    DeviceFilter::All => "All".to_owned(),
                    DeviceFilter::Device(eui) => self.device_label(eui),
                })
                .collect();
            let active = choices.iter().position(|c| *c == filters.device).unwrap_or(0);
            picker::render_picker("Device", &labels, active)
        };

        let types = EventTypeFilter::choices();
        let type_labels: Vec<String> = types.iter().map(|t| t.label().to_owned()).collect();
        let type_active = types
            .iter()
            .position(|t| *t == filters.event_type)
            .unwrap_or(0);

        let limit_labels: Vec<String> = ResultLimit::ALL.iter().map(ToString::to_string).collect();
        let limit_active = ResultLimit::ALL
            .iter()
            .position(|l| *l == filters.limit)
            .unwrap_or(0);

        let lines = vec![
            device_line,
            picker::render_picker("Type", &type_labels, type_active),
            picker::render_picker("Limit", &limit_labels, limit_active),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let [text_area, spinner_area] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(12)]).areas(area);

        let line = match self.view.stats() {
            Some(stats) => Line::from(vec![
                Span::styled(format!(" {}", stats.total_events), theme::title_style()),
                Span::styled(" events · ", theme::key_hint()),
                Span::styled(stats.unique_devices.to_string(), theme::title_style()),
                Span::styled(" devices · latest ", theme::key_hint()),
                Span::styled(
                    stats
                        .latest_event
                        .as_deref()
                        .map_or_else(|| PLACEHOLDER.to_owned(), |raw| format_or_raw(raw, TIME_FORMAT)),
                    Style::default().fg(theme::DIM_WHITE),
                ),
            ]),
            None => Line::from(Span::styled(" No statistics yet", theme::muted())),
        };
        frame.render_widget(Paragraph::new(line), text_area);

        if self.view.loading_presentation() == LoadingPresentation::Updating {
            loading::render_updating(frame, spinner_area, &self.throbber);
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            ["ID", "Type", "Device", "DevEUI", "Time", "Port", "RSSI", "SNR"]
                .into_iter()
                .map(Cell::from),
        )
        .style(theme::table_header());

        let widths = [
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Fill(2),
            Constraint::Length(18),
            Constraint::Length(20),
            Constraint::Length(5),
            Constraint::Length(10),
            Constraint::Length(9),
        ];

        let table_rows = event_table_rows(self.view.events(), true);
        if matches!(table_rows.as_slice(), [EventTableRow::NoResults]) {
            frame.render_widget(Table::new(Vec::<Row>::new(), widths).header(header), area);
            let [_, body] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
            frame.render_widget(
                Paragraph::new("No events found")
                    .style(theme::muted())
                    .alignment(Alignment::Center),
                body,
            );
            return;
        }

        let rows: Vec<Row> = table_rows
            .into_iter()
            .map(|row| match row {
                EventTableRow::Event(r) => Row::new(vec![
                    Cell::from(r.id),
                    Cell::from(r.event_type)
                        .style(Style::default().fg(theme::tag_color(r.tag))),
                    Cell::from(r.device_name),
                    Cell::from(r.dev_eui).style(theme::muted()),
                    Cell::from(r.event_time),
                    Cell::from(r.f_port),
                    Cell::from(r.rssi).style(Style::default().fg(theme::NEON_CYAN)),
                    Cell::from(r.snr).style(Style::default().fg(theme::CORAL)),
                ])
                .style(theme::table_row()),
                EventTableRow::NoResults => Row::default(),
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = TableState::default();
        if !self.view.events().is_empty() {
            state.select(Some(self.view.selected_index()));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("details  ", theme::key_hint()),
            Span::styled("f ", theme::key_hint_key()),
            Span::styled("filters  ", theme::key_hint()),
        ];
        if self.view.filters_visible() {
            if self.view.pinned_device().is_none() {
                spans.push(Span::styled("d ", theme::key_hint_key()));
                spans.push(Span::styled("device  ", theme::key_hint()));
            }
            spans.extend([
                Span::styled("t ", theme::key_hint_key()),
                Span::styled("type  ", theme::key_hint()),
                Span::styled("l ", theme::key_hint_key()),
                Span::styled("limit  ", theme::key_hint()),
                Span::styled("c ", theme::key_hint_key()),
                Span::styled("clear  ", theme::key_hint()),
            ]);
        }
        if self.view.pinned_device().is_none() {
            spans.push(Span::styled("o ", theme::key_hint_key()));
            spans.push(Span::styled("open device  ", theme::key_hint()));
        }
        spans.push(Span::styled("r ", theme::key_hint_key()));
        spans.push(Span::styled("refresh", theme::key_hint()));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_detail(frame: &mut Frame, area: Rect, event: &Event) {
        let width = 64u16.min(area.width.saturating_sub(4));
        let height = 15u16.min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let popup = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(format!(" Event {} ", event.id))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let field = |name: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {name:<12}"), theme::key_hint()),
                Span::styled(value, Style::default().fg(theme::DIM_WHITE)),
            ])
        };
        let opt = |value: Option<String>| value.unwrap_or_else(|| PLACEHOLDER.to_owned());
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        let frequency = event
            .frequency
            .map(|hz| format!("{:.3} MHz", hz as f64 / 1_000_000.0));

        let lines = vec![
            field("Type", event.event_type.description().to_owned()),
            field("Device", event.display_name().to_owned()),
            field("DevEUI", event.dev_eui.clone()),
            field("Event time", event.event_time.clone()),
            field("Received", event.received_at.clone()),
            field("F-Port", opt(event.f_port.map(|p| p.to_string()))),
            field("RSSI", opt(event.rssi.map(|v| format!("{v} dBm")))),
            field("SNR", opt(event.snr.map(|v| format!("{v} dB")))),
            field("Frequency", opt(frequency)),
            field("Data rate", opt(event.dr.map(|dr| format!("DR{dr}")))),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Esc ", theme::key_hint_key()),
                Span::styled("close", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

impl Component for EventsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.detail = None;
            }
            return Ok(None);
        }

        let filters_open = self.view.filters_visible();
        let ticket = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.view.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.view.select_prev();
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.view.select_first();
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.view.select_last();
                None
            }
            KeyCode::Enter => {
                let detail = &mut self.detail;
                self.view.view_details(|event| *detail = Some(event.clone()));
                None
            }
            KeyCode::Char('o') if self.view.pinned_device().is_none() => {
                return Ok(self
                    .view
                    .selected_event()
                    .map(|e| Action::Navigate(Route::Device(e.dev_eui.clone()))));
            }
            KeyCode::Char('f') => {
                self.view.toggle_filters();
                None
            }
            KeyCode::Char('r') => Some(self.view.refresh()),
            KeyCode::Char('d') if filters_open => self.cycle_device(true),
            KeyCode::Char('D') if filters_open => self.cycle_device(false),
            KeyCode::Char('t') if filters_open => self.cycle_event_type(true),
            KeyCode::Char('T') if filters_open => self.cycle_event_type(false),
            KeyCode::Char('l') if filters_open => self.cycle_limit(true),
            KeyCode::Char('L') if filters_open => self.cycle_limit(false),
            KeyCode::Char('c') if filters_open => Some(self.view.clear_filters()),
            _ => None,
        };

        Ok(ticket.map(|t| self.fetch(t)))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Refresh => {
                let ticket = self.view.refresh();
                return Ok(Some(self.fetch(ticket)));
            }
            Action::EventsLoaded {
                route,
                generation,
                result,
            } if *route == self.route() => {
                if self.view.apply(*generation, result.clone()) {
                    self.chart = RfChartData::from_events(self.view.events());
                } else {
                    debug!(generation, current = self.view.generation(), "dropped stale events fetch");
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
            .title(self.title())
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.view.loading_presentation() == LoadingPresentation::FullScreen {
            loading::render_full_screen(frame, inner, &self.throbber, "Loading events...");
            return;
        }

        let filters_height = if self.view.filters_visible() { 3 } else { 0 };
        let error_height = if self.view.error().is_some() { 3 } else { 0 };
        let [filters_area, summary_area, error_area, charts_area, table_area, hints_area] =
            Layout::vertical([
                Constraint::Length(filters_height),
                Constraint::Length(1),
                Constraint::Length(error_height),
                Constraint::Percentage(45),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .areas(inner);

        if self.view.filters_visible() {
            self.render_filters(frame, filters_area);
        }
        self.render_summary(frame, summary_area);
        if let Some(message) = self.view.error() {
            loading::render_error(frame, error_area, "Failed to load events", message);
        }

        match self.chart {
            Some(ref chart) => {
                rf_chart::render_rf_panel(frame, charts_area, chart, self.highlighted_sample());
            }
            None => rf_chart::render_no_data(frame, charts_area),
        }

        self.render_table(frame, table_area);
        self.render_hints(frame, hints_area);

        if let Some(ref event) = self.detail {
            Self::render_detail(frame, area, event);
        }
    }

    fn captures_escape(&self) -> bool {
        self.detail.is_some()
    }

    fn key_hints(&self) -> &'static str {
        "f filters  r refresh"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use lorascope_core::{AggregateStats, DeviceSummary, EventType, EventsSnapshot};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn uplink(id: i64, rssi: i32) -> Event {
        Event {
            id,
            event_type: EventType::Uplink,
            dev_eui: "a84041000181c4b1".into(),
            device_name: Some("estufa-01".into()),
            event_time: format!("2025-03-01T10:0{id}:00"),
            received_at: format!("2025-03-01T10:0{id}:01"),
            f_port: Some(2),
            rssi: Some(rssi),
            snr: Some(7.5),
            frequency: Some(916_800_000),
            dr: Some(3),
        }
    }

    fn snapshot(events: Vec<Event>) -> EventsSnapshot {
        EventsSnapshot {
            stats: AggregateStats {
                total_events: 42,
                unique_devices: 2,
                ..AggregateStats::default()
            },
            devices: vec![
                DeviceSummary {
                    dev_eui: "a84041000181c4b1".into(),
                    device_name: Some("estufa-01".into()),
                    event_count: 40,
                },
                DeviceSummary {
                    dev_eui: "0004a30b001c0530".into(),
                    device_name: None,
                    event_count: 2,
                },
            ],
            events,
        }
    }

    /// Run the refresh an entering page does and feed `events` back.
    fn loaded(screen: &mut EventsScreen, events: Vec<Event>) {
        let Some(Action::FetchEvents { route, ticket }) = screen.update(&Action::Refresh).unwrap()
        else {
            panic!("refresh should request a fetch");
        };
        screen
            .update(&Action::EventsLoaded {
                route,
                generation: ticket.generation,
                result: Ok(snapshot(events)),
            })
            .unwrap();
    }

    fn draw(screen: &EventsScreen) -> String {
        draw_at(screen, 140, 48)
    }

    fn draw_at(screen: &EventsScreen, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let choices = [1, 2, 3];
        assert_eq!(cycle(&choices, &3, true), Some(1));
        assert_eq!(cycle(&choices, &1, false), Some(3));
        assert_eq!(cycle::<u8>(&[], &0, true), None);
    }

    #[test]
    fn filter_keys_only_act_with_the_panel_open() {
        let mut screen = EventsScreen::new();
        loaded(&mut screen, vec![uplink(1, -97)]);

        assert!(screen.handle_key_event(key('t')).unwrap().is_none());

        screen.handle_key_event(key('f')).unwrap();
        let Some(Action::FetchEvents { route, ticket }) =
            screen.handle_key_event(key('t')).unwrap()
        else {
            panic!("type change should fetch");
        };
        assert_eq!(route, Route::ChirpStackEvents);
        assert_eq!(ticket.query.event_type.as_deref(), Some("up"));

        let Some(Action::FetchEvents { ticket, .. }) = screen.handle_key_event(key('l')).unwrap()
        else {
            panic!("limit change should fetch");
        };
        assert_eq!(ticket.query.limit, 200);
    }

    #[test]
    fn device_cycling_uses_fetched_devices() {
        let mut screen = EventsScreen::new();
        loaded(&mut screen, vec![uplink(1, -97)]);
        screen.handle_key_event(key('f')).unwrap();

        let Some(Action::FetchEvents { ticket, .. }) = screen.handle_key_event(key('d')).unwrap()
        else {
            panic!("device change should fetch");
        };
        assert_eq!(ticket.query.dev_eui.as_deref(), Some("a84041000181c4b1"));

        let Some(Action::FetchEvents { ticket, .. }) = screen.handle_key_event(key('c')).unwrap()
        else {
            panic!("clear should fetch");
        };
        assert_eq!(ticket.query.dev_eui, None);
        assert_eq!(ticket.query.limit, 100);
    }

    #[test]
    fn pinned_device_ignores_device_key_and_tags_its_route() {
        let mut screen = EventsScreen::for_device("0004a30b001c0530");
        loaded(&mut screen, vec![]);
        screen.handle_key_event(key('f')).unwrap();

        assert!(screen.handle_key_event(key('d')).unwrap().is_none());
        assert_eq!(screen.route(), Route::Device("0004a30b001c0530".into()));
        assert!(screen.handle_key_event(key('o')).unwrap().is_none());
    }

    #[test]
    fn results_for_other_routes_or_old_generations_are_ignored() {
        let mut screen = EventsScreen::new();
        loaded(&mut screen, vec![uplink(1, -97)]);

        screen
            .update(&Action::EventsLoaded {
                route: Route::Device("a84041000181c4b1".into()),
                generation: 1,
                result: Ok(snapshot(vec![])),
            })
            .unwrap();
        assert_eq!(screen.view.events().len(), 1);

        screen
            .update(&Action::EventsLoaded {
                route: Route::ChirpStackEvents,
                generation: 0,
                result: Ok(snapshot(vec![])),
            })
            .unwrap();
        assert_eq!(screen.view.events().len(), 1);
    }

    #[test]
    fn enter_opens_details_and_escape_closes_them() {
        let mut screen = EventsScreen::new();
        loaded(&mut screen, vec![uplink(1, -97), uplink(2, -101)]);

        screen.handle_key_event(key('j')).unwrap();
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(screen.detail.as_ref().map(|e| e.id), Some(2));
        assert!(screen.captures_escape());
        assert_eq!(screen.highlighted_sample(), Some(1));

        screen
            .handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert!(screen.detail.is_none());
    }

    #[test]
    fn open_device_navigates_to_selected_event_device() {
        let mut screen = EventsScreen::new();
        loaded(&mut screen, vec![uplink(1, -97)]);
        let action = screen.handle_key_event(key('o')).unwrap();
        assert!(matches!(
            action,
            Some(Action::Navigate(Route::Device(ref eui))) if eui == "a84041000181c4b1"
        ));
    }

    #[test]
    fn renders_spinner_then_table_and_error() {
        let mut screen = EventsScreen::new();
        let Some(Action::FetchEvents { route, ticket }) = screen.update(&Action::Refresh).unwrap()
        else {
            panic!("refresh should request a fetch");
        };
        assert!(draw(&screen).contains("Loading events..."));

        screen
            .update(&Action::EventsLoaded {
                route,
                generation: ticket.generation,
                result: Ok(snapshot(vec![uplink(1, -97)])),
            })
            .unwrap();
        let text = draw(&screen);
        assert!(text.contains("ChirpStack Events (1)"));
        assert!(text.contains("-97 dBm"));
        assert!(text.contains("SNR vs RSSI"));

        let Some(Action::FetchEvents { route, ticket }) = screen.update(&Action::Refresh).unwrap()
        else {
            panic!("refresh should request a fetch");
        };
        screen
            .update(&Action::EventsLoaded {
                route,
                generation: ticket.generation,
                result: Err("Backend error (HTTP 500): boom".to_owned()),
            })
            .unwrap();
        let text = draw(&screen);
        assert!(text.contains("Backend error (HTTP 500): boom"));
        assert!(text.contains("-97 dBm"), "previous data stays visible");
    }

    #[test]
    fn empty_result_shows_placeholders() {
        let mut screen = EventsScreen::new();
        loaded(&mut screen, vec![]);
        let text = draw(&screen);
        assert!(text.contains("No events found"));
        assert!(text.contains("No uplink RF data"));
    }

    #[test]
    fn narrow_terminal_keeps_scatter_and_empty_message() {
        let mut screen = EventsScreen::new();
        loaded(&mut screen, vec![uplink(1, -97), uplink(2, -104)]);
        assert!(draw_at(&screen, 80, 40).contains("SNR vs RSSI"));

        let mut empty = EventsScreen::new();
        loaded(&mut empty, vec![]);
        assert!(draw_at(&empty, 80, 40).contains("No events found"));
    }
}
