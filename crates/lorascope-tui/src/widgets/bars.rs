//! Horizontal proportion bars for the analysis report.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use lorascope_core::report::ProportionBar;

use crate::theme;

/// `  Normal       ██████░░░░░░  50.0% (2)`
///
/// `track` is the bar's full width in cells; the filled part comes from
/// [`ProportionBar::width`].
pub fn bar_line(bar: &ProportionBar, track: u16, color: Color) -> Line<'static> {
    let filled = bar.width(track);
    let empty = track.saturating_sub(filled);

    let mut spans = vec![
        Span::styled(format!("  {:<14}", bar.label), theme::table_row()),
        Span::styled(
            "█".repeat(usize::from(filled)),
            Style::default().fg(color),
        ),
        Span::styled("░".repeat(usize::from(empty)), theme::muted()),
        Span::styled(
            format!(" {:>6}", bar.percent_label),
            Style::default().fg(theme::DIM_WHITE),
        ),
    ];
    if let Some(count) = bar.count {
        spans.push(Span::styled(format!(" ({count})"), theme::muted()));
    }
    Line::from(spans)
}
