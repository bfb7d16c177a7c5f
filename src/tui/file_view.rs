//! Full-file view with matches decorated and the anchored line highlighted.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::results_view::{gutter, highlight_spans, scroll_offset};
use super::Theme;
use crate::search::models::MatchRange;
use crate::search::{FileResult, Hit, ResultState};

/// Builds the numbered lines of `file` and the index of the selected line.
#[must_use]
pub fn build_lines<'a>(
    file: &'a FileResult,
    selected: Option<&Hit>,
    theme: &Theme,
) -> (Vec<Line<'a>>, Option<usize>) {
    let selected_line = selected
        .filter(|hit| hit.is_in(&file.header))
        .map(|hit| hit.line);
    let mut selected_index = None;

    let lines = file
        .numbered_lines()
        .enumerate()
        .map(|(index, (number, text))| {
            let ranges: Vec<MatchRange> = file.matches_on(number).collect();
            let mut spans = vec![Span::styled(
                gutter(number),
                Style::default().fg(theme.text_muted),
            )];
            spans.extend(highlight_spans(
                text,
                &ranges,
                Style::default().fg(theme.text),
                theme.match_style(),
            ));
            let line = Line::from(spans);
            if selected_line == Some(number) {
                selected_index = Some(index);
                line.style(Style::default().bg(theme.highlight_bg))
            } else {
                line
            }
        })
        .collect();

    (lines, selected_index)
}

/// Renders the file view.
pub fn render(
    f: &mut Frame,
    area: Rect,
    state: Option<&ResultState<FileResult>>,
    selected: Option<&Hit>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(false));

    let message = match state {
        None => Some(("No file", theme.text_muted)),
        Some(state) if state.loading => Some(("Loading...", theme.warning)),
        _ => None,
    };
    if let Some((text, color)) = message {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(block.title(" File "));
        f.render_widget(paragraph, area);
        return;
    }

    let Some(state) = state else { return };
    if let Some(error) = &state.error {
        let paragraph = Paragraph::new(format!(
            "Failed to load file ({}): {}",
            error.code, error.message
        ))
        .style(Style::default().fg(theme.error))
        .block(block.title(" File "));
        f.render_widget(paragraph, area);
        return;
    }
    let Some(file) = &state.result else {
        f.render_widget(block.title(" File "), area);
        return;
    };

    let title = format!(
        " {} ({} matches) ",
        file.header.display_path(),
        file.matches.len()
    );
    let (lines, selected_index) = build_lines(file, selected, theme);
    let visible_height = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(selected_index, visible_height, lines.len());
    let paragraph = Paragraph::new(lines)
        .block(block.title(title))
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{FileHeader, LineMatch};

    #[test]
    fn test_selected_line_found_by_number() {
        let file = FileResult {
            header: FileHeader {
                path: "a.rs".to_string(),
                directory: "repo".to_string(),
                ..FileHeader::default()
            },
            content: "one\ntwo foo\nthree\n".to_string(),
            matches: vec![LineMatch {
                line: 2,
                range: (4, 7),
            }],
        };
        let hit = Hit::in_file(&file.header, 2);
        let (lines, selected) = build_lines(&file, Some(&hit), &Theme::dark());
        assert_eq!(lines.len(), 3);
        assert_eq!(selected, Some(1));
        // gutter, "two ", "foo"
        assert_eq!(lines[1].spans.len(), 3);
        assert_eq!(lines[1].spans[2].content, "foo");
    }

    #[test]
    fn test_hit_in_other_file_selects_nothing() {
        let file = FileResult {
            content: "x\n".to_string(),
            ..FileResult::default()
        };
        let other = Hit {
            path: "elsewhere.rs".to_string(),
            line: 1,
            ..Hit::default()
        };
        let (_, selected) = build_lines(&file, Some(&other), &Theme::dark());
        assert_eq!(selected, None);
    }
}
