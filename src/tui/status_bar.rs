//! Status bar widget for displaying status messages and help

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{AppState, Theme};
use crate::search::{path_anchor, Route};

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar with contextual help
    pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let mut content_lines: Vec<Line> = Vec::new();

        // First line: error, status message, or selection
        if let Some(error) = &state.error_message {
            content_lines.push(Line::from(vec![
                Span::styled("ERROR: ", Style::default().fg(theme.error)),
                Span::raw(error.as_str()),
            ]));
        } else if !state.status_message.is_empty() {
            content_lines.push(Line::from(state.status_message.as_str()));
        } else if let Some(hit) = &state.store.selected_hit {
            content_lines.push(Line::from(vec![
                Span::styled("Selected: ", Style::default().fg(theme.primary)),
                Span::styled(
                    format!("{}/{}", hit.directory, path_anchor(hit)),
                    Style::default().fg(theme.text_secondary),
                ),
            ]));
        } else {
            content_lines.push(Line::from(""));
        }

        content_lines.push(Self::get_indicator_line(state, theme));
        content_lines.push(Self::get_help_line(state, theme));

        let paragraph = Paragraph::new(content_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.primary)),
        );
        f.render_widget(paragraph, area);
    }

    /// Pending sequence and fetch activity.
    fn get_indicator_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let mut spans = Vec::new();
        if state.dispatcher.is_pending() {
            spans.push(Span::styled(
                "[sequence…] ",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        if state.fetch.is_loading() {
            spans.push(Span::styled("Loading… ", Style::default().fg(theme.warning)));
        }
        if let Some(field) = state.form.focused() {
            spans.push(Span::styled(
                format!("Editing {} (Esc to leave) ", field.label().to_lowercase()),
                Style::default().fg(theme.text_secondary),
            ));
        }
        Line::from(spans)
    }

    /// Key hints for the current page.
    fn get_help_line(state: &AppState, theme: &Theme) -> Line<'static> {
        let hints: &[(&str, &str)] = match state.route {
            Route::Search(_) => &[
                ("q", "Query"),
                ("s", "Search"),
                ("j/k", "Hits"),
                ("o", "Open"),
                ("g/b/h", "GitHub"),
                ("?", "Help"),
                ("Ctrl+Q", "Quit"),
            ],
            Route::File { .. } => &[
                ("r", "Back to results"),
                ("j/k", "Hits"),
                ("g/b/h", "GitHub"),
                ("O/G/B/H", "Copy URL"),
                ("?", "Help"),
                ("Ctrl+Q", "Quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(theme.text_muted)));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                format!(" {label}"),
                Style::default().fg(theme.text_muted),
            ));
        }
        Line::from(spans)
    }
}
