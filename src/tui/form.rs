//! Search form: six fields, at most one focused.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Theme;
use crate::search::Filters;

/// Field of the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Content regular expression
    Query,
    /// File path filter
    File,
    /// File path exclusion
    ExcludeFile,
    /// Context lines before each match
    LinesBefore,
    /// Context lines after each match
    LinesAfter,
    /// Case-insensitivity checkbox
    CaseInsensitive,
}

impl Field {
    /// Fields in tab order.
    pub const ALL: [Self; 6] = [
        Self::Query,
        Self::File,
        Self::ExcludeFile,
        Self::LinesBefore,
        Self::LinesAfter,
        Self::CaseInsensitive,
    ];

    /// Get the next field.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Query => Self::File,
            Self::File => Self::ExcludeFile,
            Self::ExcludeFile => Self::LinesBefore,
            Self::LinesBefore => Self::LinesAfter,
            Self::LinesAfter => Self::CaseInsensitive,
            Self::CaseInsensitive => Self::Query,
        }
    }

    /// Get the previous field.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Query => Self::CaseInsensitive,
            Self::File => Self::Query,
            Self::ExcludeFile => Self::File,
            Self::LinesBefore => Self::ExcludeFile,
            Self::LinesAfter => Self::LinesBefore,
            Self::CaseInsensitive => Self::LinesAfter,
        }
    }

    /// Get the field label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::File => "File",
            Self::ExcludeFile => "Exclude file",
            Self::LinesBefore => "Lines before",
            Self::LinesAfter => "Lines after",
            Self::CaseInsensitive => "Ignore case",
        }
    }

    /// Shortcut shown in the field title.
    #[must_use]
    pub const fn shortcut(&self) -> &'static str {
        match self {
            Self::Query => "q",
            Self::File => "f",
            Self::ExcludeFile => "x",
            Self::LinesBefore => "cb",
            Self::LinesAfter => "ca",
            Self::CaseInsensitive => "i",
        }
    }

    const fn is_numeric(self) -> bool {
        matches!(self, Self::LinesBefore | Self::LinesAfter)
    }
}

/// Result of feeding a key to the focused form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    /// The key edited the form or moved focus
    Consumed,
    /// Enter was pressed
    Submit,
    /// The form has no use for the key
    Ignored,
}

/// Editable values of the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    /// Query text
    pub query: String,
    /// File filter text
    pub file: String,
    /// Exclude-file filter text
    pub exclude_file: String,
    /// Context lines before, as typed
    pub lines_before: String,
    /// Context lines after, as typed
    pub lines_after: String,
    /// Case-insensitive matching
    pub case_insensitive: bool,
    focused: Option<Field>,
}

impl SearchForm {
    /// Creates a form showing `filters`.
    #[must_use]
    pub fn from_filters(filters: &Filters) -> Self {
        let mut form = Self::default();
        form.set_filters(filters);
        form
    }

    /// Replaces all values with `filters`, keeping focus.
    pub fn set_filters(&mut self, filters: &Filters) {
        self.query.clone_from(&filters.query);
        self.file.clone_from(&filters.file);
        self.exclude_file.clone_from(&filters.exclude_file);
        self.lines_before = number_text(filters.num_lines_before);
        self.lines_after = number_text(filters.num_lines_after);
        self.case_insensitive = filters.case_insensitive;
    }

    /// Current values as filters. Blank numeric fields count as 0.
    #[must_use]
    pub fn to_filters(&self) -> Filters {
        Filters {
            query: self.query.clone(),
            file: self.file.clone(),
            exclude_file: self.exclude_file.clone(),
            case_insensitive: self.case_insensitive,
            num_lines_before: self.lines_before.parse().unwrap_or(0),
            num_lines_after: self.lines_after.parse().unwrap_or(0),
        }
    }

    /// The focused field, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<Field> {
        self.focused
    }

    /// Returns `true` while a field has focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused.is_some()
    }

    /// Moves focus to `field`.
    pub fn focus(&mut self, field: Field) {
        self.focused = Some(field);
    }

    /// Removes focus.
    pub fn unfocus(&mut self) {
        self.focused = None;
    }

    /// Flips the case-insensitivity checkbox.
    pub fn toggle_case_insensitive(&mut self) {
        self.case_insensitive = !self.case_insensitive;
    }

    /// Flips the test-file exclusion pattern.
    pub fn toggle_test_file_exclusion(&mut self) {
        let mut filters = self.to_filters();
        filters.toggle_test_file_exclusion();
        self.exclude_file = filters.exclude_file;
    }

    /// Edits the focused field with `key`.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        let Some(field) = self.focused else {
            return FormInput::Ignored;
        };

        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => FormInput::Submit,
            (KeyCode::Tab, KeyModifiers::NONE) => {
                self.focused = Some(field.next());
                FormInput::Consumed
            }
            (KeyCode::BackTab, _) => {
                self.focused = Some(field.previous());
                FormInput::Consumed
            }
            (KeyCode::Char(' '), KeyModifiers::NONE) if field == Field::CaseInsensitive => {
                self.toggle_case_insensitive();
                FormInput::Consumed
            }
            (KeyCode::Backspace, _) => match self.text_mut(field) {
                Some(text) => {
                    text.pop();
                    FormInput::Consumed
                }
                None => FormInput::Ignored,
            },
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                if field.is_numeric() && !c.is_ascii_digit() {
                    return FormInput::Ignored;
                }
                match self.text_mut(field) {
                    Some(text) => {
                        text.push(c);
                        FormInput::Consumed
                    }
                    None => FormInput::Ignored,
                }
            }
            _ => FormInput::Ignored,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Query => Some(&mut self.query),
            Field::File => Some(&mut self.file),
            Field::ExcludeFile => Some(&mut self.exclude_file),
            Field::LinesBefore => Some(&mut self.lines_before),
            Field::LinesAfter => Some(&mut self.lines_after),
            Field::CaseInsensitive => None,
        }
    }

    fn display_value(&self, field: Field) -> String {
        match field {
            Field::Query => self.query.clone(),
            Field::File => self.file.clone(),
            Field::ExcludeFile => self.exclude_file.clone(),
            Field::LinesBefore => self.lines_before.clone(),
            Field::LinesAfter => self.lines_after.clone(),
            Field::CaseInsensitive => {
                let mark = if self.case_insensitive { "[x]" } else { "[ ]" };
                mark.to_string()
            }
        }
    }

    /// Renders the form as one row of bordered fields.
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(9),
                Constraint::Percentage(9),
                Constraint::Percentage(8),
            ])
            .split(area);

        for (field, chunk) in Field::ALL.into_iter().zip(chunks.iter()) {
            self.render_field(f, *chunk, field, theme);
        }
    }

    fn render_field(&self, f: &mut Frame, area: Rect, field: Field, theme: &Theme) {
        let is_active = self.focused == Some(field);
        let style = if is_active {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };

        let value = self.display_value(field);
        // Display value with cursor if active
        let display_value = if is_active && field != Field::CaseInsensitive {
            format!("{value}_")
        } else {
            value
        };

        let block = Block::default()
            .title(format!(" {} {} ", field.shortcut(), field.label()))
            .borders(Borders::ALL)
            .border_style(theme.border_style(is_active));

        let paragraph = Paragraph::new(display_value).style(style).block(block);
        f.render_widget(paragraph, area);
    }
}

fn number_text(value: u32) -> String {
    if value == 0 {
        String::new()
    } else {
        value.to_string()
    }
}
