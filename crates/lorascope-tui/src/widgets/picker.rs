//! Inline picker line used by the events filter panel.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// One `Label  [a]  b  c` line with the active choice bracketed.
pub fn render_picker(label: &str, choices: &[String], active_index: usize) -> Line<'static> {
    let mut spans = Vec::with_capacity(choices.len() * 2 + 1);
    spans.push(Span::styled(format!(" {label:<10}"), theme::key_hint()));

    for (i, choice) in choices.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }
        if i == active_index {
            spans.push(Span::styled(
                format!("[{choice}]"),
                theme::tab_active().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(choice.clone(), theme::tab_inactive()));
        }
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn brackets_only_the_active_choice() {
        let choices = vec!["50".to_owned(), "100".to_owned(), "200".to_owned()];
        let line = render_picker("Limit", &choices, 1);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " Limit     50  [100]  200");
    }
}
