//! Action dispatch for shortcut-triggered actions.

use anyhow::Result;

use crate::client;
use crate::search::links::is_external;
use crate::search::{LinkTarget, Route, StoreAction};
use crate::shortcuts::Action;
use crate::tui::AppState;

/// Dispatch action to appropriate handler
pub fn dispatch_action(state: &mut AppState, action: Action) -> Result<bool> {
    tracing::trace!(?action, "dispatch");
    match action {
        // Form
        Action::Unfocus => state.form.unfocus(),
        Action::Focus(field) => {
            show_search_page(state);
            state.form.focus(field);
        }
        Action::ToggleCaseInsensitive => {
            state.form.toggle_case_insensitive();
            research(state);
        }
        Action::ToggleTestFiles => {
            state.form.toggle_test_file_exclusion();
            research(state);
        }
        Action::Search => state.search(),

        // Navigation
        Action::SelectPrevious => select_hit(state, StoreAction::SelectPrevious),
        Action::SelectNext => select_hit(state, StoreAction::SelectNext),
        Action::GoToSearch => {
            show_search_page(state);
            if state.store.search_result.is_none() && state.form.to_filters().is_searchable() {
                state.search();
            }
        }

        // Links
        Action::OpenLink(target) => open_link(state, target),
        Action::CopyLink(target) => copy_link(state, target),

        // Help
        Action::ToggleHelp => {
            state.show_help = !state.show_help;
            state.help.scroll_to_top();
        }
    }
    Ok(false)
}

/// Leaves the file page without refetching.
fn show_search_page(state: &mut AppState) {
    if matches!(state.route, Route::File { .. }) {
        state.show_search_page(state.form.to_filters());
    }
}

/// Re-runs the search after a filter toggle, when there is something to search for.
fn research(state: &mut AppState) {
    if state.form.to_filters().is_searchable() {
        state.search();
    } else {
        state.show_search_page(state.form.to_filters());
    }
}

/// Moves the selection; on the file page the view follows the selected hit.
fn select_hit(state: &mut AppState, action: StoreAction<'static>) {
    if !state.dispatch(action) {
        return;
    }
    let Route::File { path, .. } = &state.route else {
        return;
    };
    let Some(hit) = state.store.selected_hit.clone() else {
        return;
    };

    let same_file = state
        .store
        .file()
        .is_some_and(|file| hit.is_in(&file.header));
    if same_file {
        state.route = Route::File {
            path: path.clone(),
            line: Some(hit.line),
        };
    } else {
        state.navigate(Route::parse(&LinkTarget::FileView.url(&hit)));
    }
}

fn open_link(state: &mut AppState, target: LinkTarget) {
    let Some(url) = link_url(state, target) else {
        return;
    };
    if is_external(&url) {
        tracing::info!(%url, "opening in browser");
        match client::open_url(&url) {
            Ok(()) => state.set_status(format!("Opened {url}")),
            Err(e) => state.set_error(format!("Failed to open {url}: {e}")),
        }
    } else {
        state.navigate(Route::parse(&url));
    }
}

fn copy_link(state: &mut AppState, target: LinkTarget) {
    let Some(url) = link_url(state, target) else {
        return;
    };
    let url = state.client.resolve(&url);
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url.clone())) {
        Ok(()) => state.set_status(format!("Copied {url}")),
        Err(e) => state.set_error(format!("Failed to copy to clipboard: {e}")),
    }
}

/// URL of `target` for the selected hit, or `None` with a status explaining why.
fn link_url(state: &mut AppState, target: LinkTarget) -> Option<String> {
    let Some(hit) = state.selected_hit() else {
        state.set_status("No hit selected");
        return None;
    };
    if target != LinkTarget::FileView && hit.repository.is_empty() {
        state.set_status(format!("No repository known for {}", hit.path));
        return None;
    }
    Some(target.url(&hit))
}
