//! Loading and error placeholders.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme;

/// Centered throbber with a label, for pages with nothing to show yet.
pub fn render_full_screen(frame: &mut Frame, area: Rect, state: &ThrobberState, label: &str) {
    let [row] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let width = (label.chars().count() as u16).saturating_add(4);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    let throbber = Throbber::default()
        .label(label)
        .style(Style::default().fg(theme::NEON_CYAN))
        .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
    frame.render_stateful_widget(throbber, cell, &mut state.clone());
}

/// Small "updating" throbber for a one-line area; existing data stays
/// visible around it.
pub fn render_updating(frame: &mut Frame, area: Rect, state: &ThrobberState) {
    let throbber = Throbber::default()
        .label("updating")
        .style(Style::default().fg(theme::ELECTRIC_YELLOW))
        .throbber_style(Style::default().fg(theme::ELECTRIC_YELLOW));
    frame.render_stateful_widget(throbber, area, &mut state.clone());
}

/// Red bordered panel with a single error message.
pub fn render_error(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(Style::default().fg(theme::ERROR_RED))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_error());
    let text = Line::from(vec![
        Span::styled(" ✗ ", Style::default().fg(theme::ERROR_RED)),
        Span::styled(message.to_owned(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
