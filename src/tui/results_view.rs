//! Search results list.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Theme;
use crate::search::models::MatchRange;
use crate::search::{File, Hit, ResultState, SearchResult};

/// Width of the line number gutter.
pub const GUTTER_WIDTH: usize = 6;

/// Splits `text` into plain and highlighted spans.
///
/// Ranges are byte offsets as reported by the backend. They may be unsorted
/// and are clamped to the text, rounding down to a character boundary;
/// overlapping parts are highlighted once.
#[must_use]
pub fn highlight_spans<'a>(
    text: &'a str,
    ranges: &[MatchRange],
    base: Style,
    highlight: Style,
) -> Vec<Span<'a>> {
    let mut ranges = ranges.to_vec();
    ranges.sort_unstable();

    let mut spans = Vec::new();
    let mut cursor = 0;
    for (start, end) in ranges {
        let start = byte_offset(text, start).max(cursor);
        let end = byte_offset(text, end);
        if start >= end {
            continue;
        }
        if cursor < start {
            spans.push(Span::styled(&text[cursor..start], base));
        }
        spans.push(Span::styled(&text[start..end], highlight));
        cursor = end;
    }
    if cursor < text.len() || spans.is_empty() {
        spans.push(Span::styled(&text[cursor..], base));
    }
    spans
}

fn byte_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Formats a line number for the gutter.
#[must_use]
pub fn gutter(number: u32) -> String {
    format!("{number:>width$} ", width = GUTTER_WIDTH - 1)
}

/// Builds the lines of the results list and the index of the selected line.
#[must_use]
pub fn build_lines<'a>(
    files: &'a [File],
    selected: Option<&Hit>,
    theme: &Theme,
) -> (Vec<Line<'a>>, Option<usize>) {
    let mut lines = Vec::new();
    let mut selected_index = None;
    let text_style = Style::default().fg(theme.text);

    for (i, file) in files.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }

        let header_style = Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD);
        let mut header = Vec::new();
        if !file.header.directory.is_empty() {
            header.push(Span::styled(
                format!("{}/", file.header.directory),
                Style::default().fg(theme.text_muted),
            ));
        }
        let path_ranges: Vec<MatchRange> = file.header.range.into_iter().collect();
        header.extend(highlight_spans(
            &file.header.path,
            &path_ranges,
            header_style,
            theme.match_style(),
        ));
        lines.push(Line::from(header));

        let in_file = selected.filter(|hit| hit.is_in(&file.header));
        let mut previous_number = None;
        for line in &file.lines {
            if previous_number.is_some_and(|previous: u32| previous + 1 < line.number) {
                lines.push(Line::styled(
                    format!("{:>width$}", "...", width = GUTTER_WIDTH - 1),
                    Style::default().fg(theme.text_muted),
                ));
            }
            previous_number = Some(line.number);

            let is_selected =
                line.range.is_some() && in_file.is_some_and(|hit| hit.line == line.number);
            let ranges: Vec<MatchRange> = line.range.into_iter().collect();
            let mut spans = vec![Span::styled(
                gutter(line.number),
                Style::default().fg(theme.text_muted),
            )];
            spans.extend(highlight_spans(
                &line.line,
                &ranges,
                text_style,
                theme.match_style(),
            ));

            let mut rendered = Line::from(spans);
            if is_selected {
                selected_index = Some(lines.len());
                rendered = rendered.style(Style::default().bg(theme.highlight_bg));
            }
            lines.push(rendered);
        }
    }

    (lines, selected_index)
}

/// First visible line so that `selected` sits in the upper third of the view.
#[must_use]
pub fn scroll_offset(selected: Option<usize>, visible_height: usize, total: usize) -> usize {
    let Some(selected) = selected else {
        return 0;
    };
    let max_offset = total.saturating_sub(visible_height);
    selected.saturating_sub(visible_height / 3).min(max_offset)
}

/// Summary shown in the results title.
#[must_use]
pub fn summary(result: &SearchResult) -> String {
    let files = result.files.len();
    let mut summary = format!(
        " {} hit{} in {} file{} ",
        result.hits,
        if result.hits == 1 { "" } else { "s" },
        files,
        if files == 1 { "" } else { "s" }
    );
    if result.truncated {
        summary.push_str("(truncated) ");
    }
    summary
}

/// Renders the results list.
pub fn render(
    f: &mut Frame,
    area: Rect,
    state: Option<&ResultState<SearchResult>>,
    selected: Option<&Hit>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(false));

    let Some(state) = state else {
        let hint = Paragraph::new("Press q to type a query, then Enter to search")
            .style(Style::default().fg(theme.text_muted))
            .block(block.title(" Results "));
        f.render_widget(hint, area);
        return;
    };

    if state.loading {
        let loading = Paragraph::new("Searching...")
            .style(Style::default().fg(theme.warning))
            .block(block.title(" Results "));
        f.render_widget(loading, area);
        return;
    }

    if let Some(error) = &state.error {
        let message = Paragraph::new(format!("Search failed ({}): {}", error.code, error.message))
            .style(Style::default().fg(theme.error))
            .block(block.title(" Results "));
        f.render_widget(message, area);
        return;
    }

    let Some(result) = &state.result else {
        f.render_widget(block.title(" Results "), area);
        return;
    };

    let (lines, selected_index) = build_lines(&result.files, selected, theme);
    let visible_height = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(selected_index, visible_height, lines.len());
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(theme.text))
        .block(block.title(summary(result)))
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    f.render_widget(paragraph, area);
}
