//! Terminal user interface components and state management.
//!
//! This module contains the main TUI loop, `AppState`, event handling,
//! and all UI widgets using Ratatui.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]

pub mod file_view;
pub mod form;
pub mod handlers;
pub mod help_overlay;
pub mod results_view;
pub mod status_bar;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::client::worker::FetchState;
use crate::client::CodeSearchClient;
use crate::config::Config;
use crate::constants::APP_NAME;
use crate::keyboard::KeySequenceDispatcher;
use crate::search::{reduce, FileRequest, Filters, Hit, Route, State, StoreAction};
use crate::shortcuts::{self, Action};

pub use form::{Field, SearchForm};
pub use help_overlay::HelpOverlayState;
pub use status_bar::StatusBar;
pub use theme::Theme;

/// Application state - single source of truth
///
/// All UI components read from this state immutably.
/// Only event handlers modify state explicitly.
pub struct AppState {
    // Core data
    /// Reducer-owned search/file results and hit selection
    pub store: Arc<State>,
    /// Page being shown
    pub route: Route,
    /// Search form values and focus
    pub form: SearchForm,

    // Input
    /// Key sequence recognizer with the default shortcuts installed
    pub dispatcher: KeySequenceDispatcher<Action>,

    // Backend
    /// Backend client
    pub client: CodeSearchClient,
    /// In-flight requests
    pub fetch: FetchState,

    // UI state
    /// Current UI theme
    pub theme: Theme,
    /// Whether the help overlay is shown
    pub show_help: bool,
    /// Help overlay scroll state
    pub help: HelpOverlayState,
    /// Status bar message
    pub status_message: String,
    /// Current error message (if any)
    pub error_message: Option<String>,
    /// Application configuration
    pub config: Config,

    // Control flags
    /// Whether application should exit
    pub should_quit: bool,
}

impl AppState {
    /// Creates the state and installs the default shortcuts.
    ///
    /// # Errors
    ///
    /// Returns error if the shortcut table contains conflicting sequences
    pub fn new(config: Config, client: CodeSearchClient) -> Result<Self> {
        let mut dispatcher = KeySequenceDispatcher::new();
        shortcuts::install(&mut dispatcher).context("Failed to install keyboard shortcuts")?;

        Ok(Self {
            store: Arc::new(State::default()),
            route: Route::default(),
            form: SearchForm::default(),
            dispatcher,
            client,
            fetch: FetchState::new(),
            theme: Theme::from_mode(config.ui.theme_mode),
            show_help: config.ui.show_help_on_startup,
            help: HelpOverlayState::new(),
            status_message: "Press ? for help".to_string(),
            error_message: None,
            config,
            should_quit: false,
        })
    }

    /// Runs `action` through the reducer.
    ///
    /// Returns `true` if the state changed.
    pub fn dispatch(&mut self, action: StoreAction<'_>) -> bool {
        let next = reduce(&self.store, action);
        if Arc::ptr_eq(&next, &self.store) {
            return false;
        }
        self.store = next;
        true
    }

    /// A copy of the selected hit, if any.
    pub fn selected_hit(&mut self) -> Option<Hit> {
        let mut selected = None;
        self.dispatch(StoreAction::WithSelectedHit(Box::new(|hit: &Hit| {
            selected = Some(hit.clone());
        })));
        selected
    }

    /// Switches to `route`, fetching what it needs.
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(url = %route.to_url(), "navigate");
        match &route {
            Route::Search(filters) => {
                self.form.set_filters(filters);
                self.search();
            }
            Route::File { path, line } => {
                let request = FileRequest::new(path.clone(), &self.form.to_filters());
                let loading = self.fetch.start_file(&self.client, request, *line);
                self.dispatch(loading);
                self.route = route;
            }
        }
    }

    /// Shows the search page for `filters` without fetching.
    ///
    /// A file fetch still running is abandoned so its late response cannot
    /// replace the selection.
    pub fn show_search_page(&mut self, filters: Filters) {
        if matches!(self.route, Route::File { .. }) {
            self.fetch.cancel_file();
        }
        self.route = Route::Search(filters);
    }

    /// Runs a search with the current form values.
    pub fn search(&mut self) {
        let filters = self.form.to_filters();
        self.show_search_page(filters.clone());
        if !filters.is_searchable() {
            self.set_status("Enter a query or a file pattern to search");
            return;
        }
        let loading = self.fetch.start_search(&self.client, filters);
        self.dispatch(loading);
        self.set_status("Searching...");
    }

    /// Applies finished fetches. Returns `true` if anything arrived.
    pub fn poll_fetches(&mut self) -> bool {
        let actions = self.fetch.poll();
        let received = !actions.is_empty();
        for action in actions {
            self.dispatch(action);
        }
        if received && !self.fetch.is_loading() {
            self.status_message.clear();
        }
        received
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.error_message = None;
    }

    /// Set error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        let error = error.into();
        tracing::warn!(%error, "error shown");
        self.error_message = Some(error);
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        // Render current state
        terminal.draw(|f| render(f, state))?;

        // Poll for events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if handle_key_event(state, key)? {
                    break; // User quit
                }
            }
            // Resize and other events re-render on the next loop
        }

        // Apply finished fetches
        state.poll_fetches();

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Render the UI from current state
fn render(f: &mut Frame, state: &AppState) {
    // Fill entire screen with theme background color first
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Main content
            Constraint::Length(5), // Status bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], state);
    render_main_content(f, chunks[1], state);
    StatusBar::render(f, chunks[2], state, &state.theme);

    if state.show_help {
        state.help.render(f, f.area(), &state.theme);
    }

    // Render error overlay on top of everything if error is present
    if let Some(ref error) = state.error_message {
        render_error_overlay(f, error, &state.theme);
    }
}

/// Render title bar with the current URL and backend
fn render_title_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let title = Line::from(vec![
        Span::styled(
            format!(" {APP_NAME} "),
            Style::default()
                .fg(state.theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            state.route.to_url(),
            Style::default().fg(state.theme.text_secondary),
        ),
        Span::styled(
            format!("  @ {}", state.client.base_url()),
            Style::default().fg(state.theme.text_muted),
        ),
    ]);

    let title_widget = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(state.theme.primary))
            .style(Style::default().bg(state.theme.background)),
    );

    f.render_widget(title_widget, area);
}

/// Render the page selected by the route
fn render_main_content(f: &mut Frame, area: Rect, state: &AppState) {
    let selected = state.store.selected_hit.as_ref();
    match state.route {
        Route::Search(_) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(3)])
                .split(area);
            state.form.render(f, chunks[0], &state.theme);
            results_view::render(
                f,
                chunks[1],
                state.store.search_result.as_deref(),
                selected,
                &state.theme,
            );
        }
        Route::File { .. } => {
            file_view::render(
                f,
                area,
                state.store.file_result.as_deref(),
                selected,
                &state.theme,
            );
        }
    }
}

/// Render error overlay on top of all other UI elements
fn render_error_overlay(f: &mut Frame, error: &str, theme: &Theme) {
    let area = centered_rect(70, 40, f.area());

    // Clear the background area first
    f.render_widget(Clear, area);

    let background = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(background, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Error message
            Constraint::Length(3), // Help text
        ])
        .split(area);

    let title = Paragraph::new("ERROR")
        .style(Style::default().fg(theme.error).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(theme.error).bg(theme.background)),
        );
    f.render_widget(title, chunks[0]);

    let error_text = Paragraph::new(error)
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Details ")
                .style(Style::default().bg(theme.background)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(error_text, chunks[1]);

    let help = Paragraph::new(Line::from(vec![
        Span::styled(
            "Enter/Esc",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Dismiss"),
    ]))
    .style(Style::default().fg(theme.text).bg(theme.background))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(help, chunks[2]);
}

/// Helper to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Handle keyboard input events
///
/// Returns `true` when the user asked to quit.
pub fn handle_key_event(state: &mut AppState, key: event::KeyEvent) -> Result<bool> {
    if key.kind == event::KeyEventKind::Release {
        return Ok(false);
    }

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'q'))
    {
        state.should_quit = true;
        return Ok(true);
    }

    // If error overlay is shown, allow dismissing with Enter or Esc
    if state.error_message.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.clear_error();
        }
        // Block all other input while error is shown
        return Ok(false);
    }

    if state.show_help {
        return handlers::handle_help_input(state, key);
    }

    handlers::handle_main_input(state, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{FileHeader, ResultState, SearchResult};
    use crossterm::event::KeyEvent;

    fn app() -> AppState {
        let client =
            CodeSearchClient::new("http://127.0.0.1:9", Duration::from_millis(10)).unwrap();
        AppState::new(Config::new(), client).unwrap()
    }

    fn press(state: &mut AppState, code: KeyCode) -> bool {
        handle_key_event(state, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_new_state_has_shortcuts_installed() {
        let state = app();
        assert!(state.dispatcher.is_listening());
        assert!(!state.show_help);
        assert_eq!(state.route, Route::default());
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut state = app();
        let quit = handle_key_event(
            &mut state,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        )
        .unwrap();
        assert!(quit);
        assert!(state.should_quit);
    }

    #[test]
    fn test_focus_type_and_unfocus() {
        let mut state = app();
        press(&mut state, KeyCode::Char('q'));
        assert_eq!(state.form.focused(), Some(Field::Query));

        // Letters bound to shortcuts are typed while a field has focus
        for c in "jk?".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        assert_eq!(state.form.query, "jk?");
        assert!(!state.show_help);

        press(&mut state, KeyCode::Esc);
        assert!(!state.form.is_focused());
    }

    #[test]
    fn test_error_overlay_blocks_input() {
        let mut state = app();
        state.set_error("boom");
        press(&mut state, KeyCode::Char('?'));
        assert!(!state.show_help);
        press(&mut state, KeyCode::Esc);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn test_help_toggle() {
        let mut state = app();
        press(&mut state, KeyCode::Char('?'));
        assert!(state.show_help);
        press(&mut state, KeyCode::Down);
        assert_eq!(state.help.scroll_offset, 1);
        press(&mut state, KeyCode::Char('?'));
        assert!(!state.show_help);
    }

    #[test]
    fn test_search_without_filters_only_sets_status() {
        let mut state = app();
        press(&mut state, KeyCode::Char('s'));
        assert!(state.store.search_result.is_none());
        assert!(!state.fetch.is_loading());
        assert!(state.status_message.contains("query"));
    }

    #[test]
    fn test_hit_navigation_keys_move_selection() {
        let mut state = app();
        let header = FileHeader {
            path: "a.rs".to_string(),
            ..FileHeader::default()
        };
        let lines = [1, 4]
            .into_iter()
            .map(|number| crate::search::Line {
                line: String::new(),
                number,
                range: Some((0, 1)),
            })
            .collect();
        let result = SearchResult {
            files: vec![crate::search::File {
                header: header.clone(),
                lines,
            }],
            ..SearchResult::default()
        };
        state.dispatch(StoreAction::SetSearchResult(Some(ResultState::ready(result))));
        assert_eq!(state.selected_hit(), Some(Hit::in_file(&header, 1)));

        press(&mut state, KeyCode::Char('j'));
        assert_eq!(state.selected_hit(), Some(Hit::in_file(&header, 4)));
        press(&mut state, KeyCode::Up);
        assert_eq!(state.selected_hit(), Some(Hit::in_file(&header, 1)));
    }

    #[test]
    fn test_links_without_selection_report_status() {
        let mut state = app();
        press(&mut state, KeyCode::Char('g'));
        assert!(state.status_message.contains("No hit selected"));
        assert!(state.error_message.is_none());
    }
}
