//! ML analysis screen — parameter form on the left, report on the right.
//!
//! Layout:
//! ┌─ Parameters ──────────┐┌─ Result ────────────────────────────────┐
//! │ ▸ Analysis  Clustering ││ Analysis clustering · temperature ·    │
//! │   Field     Temperature││ last_30_days                           │
//! │   Range     Last 30 d. ││                                        │
//! │                        ││ Cluster 0   12 points  mean 21.40 …    │
//! │  [ Run analysis ]      ││                                        │
//! └────────────────────────┘└────────────────────────────────────────┘

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use throbber_widgets_tui::ThrobberState;

use lorascope_core::model::analysis::{cycle_next, cycle_prev};
use lorascope_core::report::{
    ClassificationReport, ClusteringReport, PredictionReport, ReportBody,
};
use lorascope_core::{AnalysisParams, AnalysisReport, AnalysisView};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{bars, loading};

/// Form rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Kind,
    Target,
    Range,
}

impl FormField {
    const ALL: [FormField; 3] = [Self::Kind, Self::Target, Self::Range];

    fn label(self) -> &'static str {
        match self {
            Self::Kind => "Analysis",
            Self::Target => "Field",
            Self::Range => "Range",
        }
    }

    fn value(self, params: AnalysisParams) -> &'static str {
        match self {
            Self::Kind => params.kind.label(),
            Self::Target => params.target.label(),
            Self::Range => params.range.label(),
        }
    }

    fn cycle(self, params: &mut AnalysisParams, forward: bool) {
        match (self, forward) {
            (Self::Kind, true) => params.kind = cycle_next(params.kind),
            (Self::Kind, false) => params.kind = cycle_prev(params.kind),
            (Self::Target, true) => params.target = cycle_next(params.target),
            (Self::Target, false) => params.target = cycle_prev(params.target),
            (Self::Range, true) => params.range = cycle_next(params.range),
            (Self::Range, false) => params.range = cycle_prev(params.range),
        }
    }
}

fn class_color(label: &str) -> Color {
    match label {
        "Low" => theme::LIGHT_BLUE,
        "Normal" => theme::SUCCESS_GREEN,
        "High" => theme::CORAL,
        _ => theme::ELECTRIC_PURPLE,
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {title}"),
        Style::default()
            .fg(theme::ELECTRIC_PURPLE)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field(name: &str, value: impl Into<String>) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("  {name} "), theme::key_hint()),
        Span::styled(value.into(), Style::default().fg(theme::NEON_CYAN)),
    ]
}

fn clustering_lines(r: &ClusteringReport, lines: &mut Vec<Line<'static>>) {
    let mut summary = field("Points", r.total_points.clone());
    summary.extend(field("  Clusters", r.cluster_count.clone()));
    summary.extend(field("  Inertia", r.inertia.clone()));
    lines.push(Line::from(summary));
    lines.push(Line::from(""));

    lines.push(section("Clusters"));
    for card in &r.clusters {
        lines.push(Line::from(vec![
            Span::styled(format!("  Cluster {:<3}", card.cluster_id), theme::title_style()),
            Span::styled(format!("{:>6} points", card.count), theme::table_row()),
        ]));
        let mut stats = field("  mean", card.mean.clone());
        stats.extend(field("std", card.std.clone()));
        stats.extend(field("min", card.min.clone()));
        stats.extend(field("max", card.max.clone()));
        lines.push(Line::from(stats));
    }

    if !r.centers.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Centers"));
        lines.extend(
            r.centers
                .iter()
                .map(|c| Line::from(Span::styled(format!("  {c}"), theme::table_row()))),
        );
    }
}

fn prediction_lines(r: &PredictionReport, track: u16, lines: &mut Vec<Line<'static>>) {
    let mut summary = field("Model score", r.model_score.clone());
    summary.extend(field("  Predictions", r.prediction_count.to_string()));
    lines.push(Line::from(summary));
    lines.push(Line::from(""));

    lines.push(section("Forecast"));
    for p in &r.predictions {
        lines.push(Line::from(vec![
            Span::styled(format!("  step {:>3}  ", p.step), theme::muted()),
            Span::styled(
                format!("{:>10}", p.value),
                Style::default().fg(theme::NEON_CYAN),
            ),
            Span::styled(format!("  {}", p.timestamp), theme::muted()),
        ]));
    }

    if !r.feature_importance.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Feature importance"));
        lines.extend(
            r.feature_importance
                .iter()
                .map(|bar| bars::bar_line(bar, track, theme::ELECTRIC_PURPLE)),
        );
    }
}

fn classification_lines(r: &ClassificationReport, track: u16, lines: &mut Vec<Line<'static>>) {
    let mut summary = field("Accuracy", r.accuracy.clone());
    summary.extend(field("  Classified", r.total_classified.to_string()));
    lines.push(Line::from(summary));
    lines.push(Line::from(""));

    if !r.bands.is_empty() {
        lines.push(section("Thresholds"));
        for band in &r.bands {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<8}", band.label),
                    Style::default().fg(class_color(band.label)),
                ),
                Span::styled(band.range.clone(), theme::table_row()),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(section("Distribution"));
    lines.extend(
        r.distribution
            .iter()
            .map(|bar| bars::bar_line(bar, track, class_color(&bar.label))),
    );
}

/// Every line of a report, header first. `track` sizes the bars.
fn report_lines(report: &AnalysisReport, track: u16) -> Vec<Line<'static>> {
    let h = &report.header;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {}", h.analysis_type), theme::title_style()),
            Span::styled(" · ", theme::muted()),
            Span::styled(h.target_field.clone(), theme::table_row()),
            Span::styled(" · ", theme::muted()),
            Span::styled(h.time_range.clone(), theme::table_row()),
        ]),
        Line::from(vec![
            Span::styled(format!(" dataset {}", h.dataset), theme::muted()),
            Span::styled(format!("  completed {}", h.completed_at), theme::muted()),
        ]),
    ];
    if let Some(ref message) = h.message {
        lines.push(Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(theme::SUCCESS_GREEN),
        )));
    }
    lines.push(Line::from(""));

    match &report.body {
        ReportBody::Clustering(r) => clustering_lines(r, &mut lines),
        ReportBody::Prediction(r) => prediction_lines(r, track, &mut lines),
        ReportBody::Classification(r) => classification_lines(r, track, &mut lines),
        ReportBody::Raw {
            declared_kind,
            dump,
        } => {
            lines.push(Line::from(Span::styled(
                format!(" Unrecognized result for '{declared_kind}'"),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            )));
            lines.extend(
                dump.lines()
                    .map(|l| Line::from(Span::styled(format!("  {l}"), theme::muted()))),
            );
        }
    }
    lines
}

pub struct AnalysisScreen {
    view: AnalysisView,
    focus: FormField,
    scroll: u16,
    throbber: ThrobberState,
}

impl AnalysisScreen {
    pub fn new() -> Self {
        Self {
            view: AnalysisView::new(),
            focus: FormField::Kind,
            scroll: 0,
            throbber: ThrobberState::default(),
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let idx = FormField::ALL
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        let len = FormField::ALL.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.focus = FormField::ALL.get(next).copied().unwrap_or(FormField::Kind);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Parameters ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let params = self.view.params();
        let mut lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|&f| {
                let focused = f == self.focus;
                let marker = if focused { "▸ " } else { "  " };
                let value_style = if focused {
                    theme::tab_active()
                } else {
                    Style::default().fg(theme::DIM_WHITE)
                };
                Line::from(vec![
                    Span::styled(format!(" {marker}"), theme::key_hint_key()),
                    Span::styled(format!("{:<10}", f.label()), theme::key_hint()),
                    Span::styled(f.value(params), value_style),
                ])
            })
            .collect();

        lines.push(Line::from(""));
        let button = if self.view.is_in_flight() {
            Span::styled("  [ Processing... ]", theme::muted())
        } else {
            Span::styled(
                "  [ Run analysis ]",
                Style::default()
                    .fg(theme::SUCCESS_GREEN)
                    .add_modifier(Modifier::BOLD),
            )
        };
        lines.push(Line::from(button));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("field  ", theme::key_hint()),
            Span::styled("h/l ", theme::key_hint_key()),
            Span::styled("change", theme::key_hint()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Enter ", theme::key_hint_key()),
            Span::styled("run  ", theme::key_hint()),
            Span::styled("J/K ", theme::key_hint_key()),
            Span::styled("scroll", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_result(&self, frame: &mut Frame, area: Rect) {
        if let Some(message) = self.view.error() {
            loading::render_error(frame, area, "Analysis failed", message);
            return;
        }

        let block = Block::default()
            .title(" Result ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.view.is_in_flight() {
            loading::render_full_screen(frame, inner, &self.throbber, "Processing analysis...");
            return;
        }

        let Some(report) = self.view.report() else {
            frame.render_widget(
                Paragraph::new("  Pick the parameters and press Enter to run an analysis")
                    .style(theme::muted()),
                inner,
            );
            return;
        };

        let track = inner.width.saturating_sub(32).clamp(4, 40);
        frame.render_widget(
            Paragraph::new(report_lines(report, track))
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            inner,
        );
    }
}

impl Component for AnalysisScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_focus(true),
            KeyCode::Char('k') | KeyCode::Up => self.move_focus(false),
            KeyCode::Char('l') | KeyCode::Right => {
                let focus = self.focus;
                self.view.update_params(|p| focus.cycle(p, true));
            }
            KeyCode::Char('h') | KeyCode::Left => {
                let focus = self.focus;
                self.view.update_params(|p| focus.cycle(p, false));
            }
            KeyCode::Char('J') | KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(5);
            }
            KeyCode::Char('K') | KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(5);
            }
            KeyCode::Enter => {
                self.scroll = 0;
                return Ok(self.view.submit().map(Action::RunAnalysis));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::AnalysisFinished(result) => self.view.finish(result.clone()),
            Action::Tick => {
                if self.view.is_in_flight() {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [form_area, result_area] =
            Layout::horizontal([Constraint::Length(42), Constraint::Min(30)]).areas(area);
        self.render_form(frame, form_area);
        self.render_result(frame, result_area);
    }

    fn key_hints(&self) -> &'static str {
        "h/l change  Enter run"
    }
}
