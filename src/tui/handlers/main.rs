//! Main UI input handler.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

use crate::keyboard::{KeyOutcome, KeyPress};
use crate::shortcuts::Action;
use crate::tui::form::{Field, FormInput};
use crate::tui::AppState;

/// Handle input for main UI
///
/// Keys go to the sequence dispatcher first. While a form field has focus
/// the dispatcher only reacts to Escape and everything else is typed.
pub fn handle_main_input(state: &mut AppState, key: KeyEvent) -> Result<bool> {
    let typing = state.form.is_focused();

    let Some(press) = KeyPress::from_crossterm(&key, typing) else {
        // Keys without a label can still edit the form
        return handle_form_input(state, key, typing);
    };

    match state.dispatcher.handle_key(&press, Instant::now()) {
        KeyOutcome::Fired(action) => super::dispatch_action(state, action),
        KeyOutcome::Ignored => handle_form_input(state, key, typing),
        KeyOutcome::Unmatched if key.code == KeyCode::Tab => {
            state.form.focus(Field::Query);
            Ok(false)
        }
        KeyOutcome::Unmatched | KeyOutcome::Pending => Ok(false),
    }
}

fn handle_form_input(state: &mut AppState, key: KeyEvent, typing: bool) -> Result<bool> {
    if !typing {
        return Ok(false);
    }
    match state.form.handle_key(key) {
        FormInput::Submit => super::dispatch_action(state, Action::Search),
        FormInput::Consumed | FormInput::Ignored => Ok(false),
    }
}
