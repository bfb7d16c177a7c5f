//! Background fetches with stale-response discarding.
//!
//! Every request runs on its own thread and reports back over a channel.
//! Requests are numbered per kind; when a newer search (or file) request has
//! been issued, responses to older ones are dropped on arrival.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;

use super::{CodeSearchClient, FetchError};
use crate::search::{FileRequest, FileResult, Filters, ResultState, SearchResult, StoreAction};

/// Identifier of one request, increasing per kind.
pub type RequestId = u64;

/// Response delivered by a fetch thread.
#[derive(Debug)]
pub enum FetchMessage {
    /// A search finished
    Search {
        /// Request this answers
        id: RequestId,
        /// Parsed response or failure
        result: Result<SearchResult, FetchError>,
    },
    /// A file fetch finished
    File {
        /// Request this answers
        id: RequestId,
        /// Line anchor of the request
        line: Option<u32>,
        /// Parsed response or failure
        result: Result<FileResult, FetchError>,
    },
}

/// Tracks in-flight requests.
pub struct FetchState {
    sender: Sender<FetchMessage>,
    receiver: Receiver<FetchMessage>,
    latest_search: RequestId,
    latest_file: RequestId,
    in_flight: usize,
}

impl FetchState {
    /// Creates a tracker with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            latest_search: 0,
            latest_file: 0,
            in_flight: 0,
        }
    }

    /// Returns `true` while a request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Starts a search and returns the action that marks it loading.
    pub fn start_search(
        &mut self,
        client: &CodeSearchClient,
        filters: Filters,
    ) -> StoreAction<'static> {
        let id = self.next_search_id();
        let sender = self.sender.clone();
        let client = client.clone();
        tracing::info!(id, query = %filters.query, file = %filters.file, "search started");
        thread::spawn(move || {
            let result = client.search(&filters);
            let _ = sender.send(FetchMessage::Search { id, result });
        });
        StoreAction::SetSearchResult(Some(ResultState::loading()))
    }

    /// Starts a file fetch and returns the action that marks it loading.
    pub fn start_file(
        &mut self,
        client: &CodeSearchClient,
        request: FileRequest,
        line: Option<u32>,
    ) -> StoreAction<'static> {
        let id = self.next_file_id();
        let sender = self.sender.clone();
        let client = client.clone();
        tracing::info!(id, path = %request.path, "file fetch started");
        thread::spawn(move || {
            let result = client.file(&request);
            let _ = sender.send(FetchMessage::File { id, line, result });
        });
        StoreAction::SetFileResult {
            result: Some(ResultState::loading()),
            line,
        }
    }

    /// Drains finished requests and turns current ones into store actions.
    ///
    /// Each delivered response yields exactly one action; stale responses
    /// yield none.
    pub fn poll(&mut self) -> Vec<StoreAction<'static>> {
        let mut actions = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    if let Some(action) = self.handle_message(message) {
                        actions.push(action);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        actions
    }

    fn handle_message(&self, message: FetchMessage) -> Option<StoreAction<'static>> {
        match message {
            FetchMessage::Search { id, result } => {
                if id != self.latest_search {
                    tracing::debug!(id, latest = self.latest_search, "discarding stale search");
                    return None;
                }
                log_outcome("search", id, result.as_ref().err());
                Some(StoreAction::SetSearchResult(Some(ResultState::from_result(
                    result,
                ))))
            }
            FetchMessage::File { id, line, result } => {
                if id != self.latest_file {
                    tracing::debug!(id, latest = self.latest_file, "discarding stale file");
                    return None;
                }
                log_outcome("file", id, result.as_ref().err());
                Some(StoreAction::SetFileResult {
                    result: Some(ResultState::from_result(result)),
                    line,
                })
            }
        }
    }

    /// Abandons the running file fetch, if any; its response is discarded.
    pub fn cancel_file(&mut self) {
        self.latest_file += 1;
    }

    #[cfg(test)]
    pub(crate) fn deliver(&self, message: FetchMessage) {
        let _ = self.sender.send(message);
    }

    fn next_search_id(&mut self) -> RequestId {
        self.latest_search += 1;
        self.in_flight += 1;
        self.latest_search
    }

    fn next_file_id(&mut self) -> RequestId {
        self.latest_file += 1;
        self.in_flight += 1;
        self.latest_file
    }
}

impl Default for FetchState {
    fn default() -> Self {
        Self::new()
    }
}

fn log_outcome(kind: &str, id: RequestId, error: Option<&FetchError>) {
    match error {
        Some(error) => tracing::warn!(id, code = error.code, "{kind} failed: {error}"),
        None => tracing::info!(id, "{kind} finished"),
    }
}
