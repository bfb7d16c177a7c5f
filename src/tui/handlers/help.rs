//! Help overlay input handler.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::AppState;

/// Approximate page height used for PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// Handle input while the help overlay is shown
pub fn handle_help_input(state: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') => {
            state.show_help = false;
            state.help.scroll_to_top();
        }
        KeyCode::Up | KeyCode::Char('k') => state.help.scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => state.help.scroll_down(),
        KeyCode::PageUp => state.help.page_up(PAGE_LINES),
        KeyCode::PageDown => state.help.page_down(PAGE_LINES),
        KeyCode::Home => state.help.scroll_to_top(),
        KeyCode::End => state.help.scroll_to_bottom(),
        _ => {}
    }
    Ok(false)
}
