//! Shared test fixtures for search result tests.
#![allow(dead_code)]

use codesearch_tui::search::{File, FileHeader, Hit, Line, ResultState, SearchResult};
use std::fs;
use std::path::PathBuf;

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Loads `tests/fixtures/search_result.json`: two files with hits
/// F1:1, F1:3 and F2:2.
pub fn search_result() -> SearchResult {
    let json = fs::read_to_string(fixture_path("search_result.json")).unwrap();
    serde_json::from_str(&json).unwrap()
}

/// Wraps a search result as a loaded result state.
pub fn loaded(result: SearchResult) -> Option<ResultState<SearchResult>> {
    Some(ResultState::ready(result))
}

/// Hit on `line` of the `index`th file of `result`.
pub fn hit(result: &SearchResult, index: usize, line: u32) -> Hit {
    Hit::in_file(&result.files[index].header, line)
}

/// A file at `path` whose `matched` lines carry a match.
pub fn file(path: &str, matched: &[u32]) -> File {
    File {
        header: FileHeader {
            path: path.to_string(),
            directory: "repo".to_string(),
            ..FileHeader::default()
        },
        lines: matched
            .iter()
            .map(|&number| Line {
                line: format!("line {number}"),
                number,
                range: Some((0, 4)),
            })
            .collect(),
    }
}

/// A search result over `files`.
pub fn result_of(files: Vec<File>) -> SearchResult {
    SearchResult {
        files,
        truncated: false,
        hits: 0,
    }
}
