//! Hit navigation state machine.
//!
//! [`reduce`] is a pure transition function over [`State`]. It returns the
//! very same `Arc` when nothing changed, so observers can skip redrawing with
//! [`Arc::ptr_eq`], and a fresh `Arc` otherwise. The input state is never
//! mutated.

use std::fmt;
use std::sync::Arc;

use super::hits::{hits, Hit};
use super::models::{File, FileResult, ResultState, SearchResult};

/// Application state owned by the reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// Latest search response, if a search was issued
    pub search_result: Option<Arc<ResultState<SearchResult>>>,
    /// Latest file response, if a file was opened
    pub file_result: Option<Arc<ResultState<FileResult>>>,
    /// Currently selected hit
    pub selected_hit: Option<Hit>,
}

impl State {
    /// Files of the current search result, or an empty slice.
    #[must_use]
    pub fn search_files(&self) -> &[File] {
        self.search_result
            .as_deref()
            .and_then(|state| state.result.as_ref())
            .map(|result| result.files.as_slice())
            .unwrap_or_default()
    }

    /// The current file result, if it loaded successfully.
    #[must_use]
    pub fn file(&self) -> Option<&FileResult> {
        self.file_result
            .as_deref()
            .and_then(|state| state.result.as_ref())
    }
}

/// Transitions understood by [`reduce`].
pub enum StoreAction<'a> {
    /// Replace the search result and select the next hit.
    SetSearchResult(Option<ResultState<SearchResult>>),
    /// Replace the file result and select `line` of that file.
    SetFileResult {
        /// New file result
        result: Option<ResultState<FileResult>>,
        /// Requested line anchor
        line: Option<u32>,
    },
    /// Select the hit before the current one.
    SelectPrevious,
    /// Select the hit after the current one.
    SelectNext,
    /// Select a specific hit, bypassing traversal.
    SetSelectedHit(Option<Hit>),
    /// Run a callback with the selected hit, if any.
    WithSelectedHit(Box<dyn FnOnce(&Hit) + 'a>),
}

impl fmt::Debug for StoreAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetSearchResult(result) => {
                f.debug_tuple("SetSearchResult").field(result).finish()
            }
            Self::SetFileResult { result, line } => f
                .debug_struct("SetFileResult")
                .field("result", result)
                .field("line", line)
                .finish(),
            Self::SelectPrevious => f.write_str("SelectPrevious"),
            Self::SelectNext => f.write_str("SelectNext"),
            Self::SetSelectedHit(hit) => f.debug_tuple("SetSelectedHit").field(hit).finish(),
            Self::WithSelectedHit(_) => f.write_str("WithSelectedHit(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Previous,
    Next,
}

/// Computes the state that follows `state` under `action`.
#[must_use]
pub fn reduce(state: &Arc<State>, action: StoreAction<'_>) -> Arc<State> {
    match action {
        StoreAction::SetSearchResult(result) => {
            let replaced = Arc::new(State {
                search_result: result.map(Arc::new),
                ..State::clone(state)
            });
            let selected = select(&replaced, Direction::Next);
            if Arc::ptr_eq(&selected, &replaced) {
                replaced
            } else {
                selected
            }
        }
        StoreAction::SetFileResult { result, line } => {
            let selected_hit = result
                .as_ref()
                .and_then(|state| state.result.as_ref())
                .map(|file| Hit::in_file(&file.header, line.unwrap_or(0)));
            Arc::new(State {
                file_result: result.map(Arc::new),
                selected_hit,
                ..State::clone(state)
            })
        }
        StoreAction::SelectPrevious => select(state, Direction::Previous),
        StoreAction::SelectNext => select(state, Direction::Next),
        StoreAction::SetSelectedHit(hit) => with_selection(state, hit),
        StoreAction::WithSelectedHit(callback) => {
            if let Some(hit) = &state.selected_hit {
                callback(hit);
            }
            Arc::clone(state)
        }
    }
}

fn select(state: &Arc<State>, direction: Direction) -> Arc<State> {
    let files = state.search_files();
    let Some(first) = hits(files).next() else {
        return with_selection(state, None);
    };

    let Some(selected) = &state.selected_hit else {
        return with_selection(state, Some(first));
    };

    let mut previous = None;
    let mut found = false;
    for hit in hits(files) {
        if found {
            return with_selection(state, Some(hit));
        }
        if hit.same_line(selected) {
            match direction {
                Direction::Previous => return with_selection(state, previous),
                Direction::Next => found = true,
            }
        }
        previous = Some(hit);
    }

    if found {
        // Selected hit was the last one
        with_selection(state, None)
    } else {
        // Selected hit is gone from the result set
        with_selection(state, Some(first))
    }
}

fn with_selection(state: &Arc<State>, selected_hit: Option<Hit>) -> Arc<State> {
    if state.selected_hit == selected_hit {
        return Arc::clone(state);
    }
    Arc::new(State {
        selected_hit,
        ..State::clone(state)
    })
}
