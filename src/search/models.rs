//! Result types returned by the codesearch backend.
//!
//! These mirror the JSON produced by `/rest/search` and `/rest/file`.

use serde::{Deserialize, Serialize};

use crate::client::FetchError;

/// Half-open character range `[start, end)` of a match within a line or path.
pub type MatchRange = (usize, usize);

/// One line of a matched file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line text without trailing newline
    pub line: String,
    /// 1-based line number
    pub number: u32,
    /// Match range; context lines have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<MatchRange>,
}

/// Identity of a file in the index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileHeader {
    /// Path relative to its directory
    #[serde(default)]
    pub path: String,
    /// Index directory the file lives under
    #[serde(default)]
    pub directory: String,
    /// Repository URL (e.g. `https://github.com/org/repo`)
    #[serde(default)]
    pub repository: String,
    /// Branch name
    #[serde(default)]
    pub branch: String,
    /// Match range of the file filter within `path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<MatchRange>,
}

impl FileHeader {
    /// Full path as shown to the user: `directory/path`.
    #[must_use]
    pub fn display_path(&self) -> String {
        if self.directory.is_empty() {
            self.path.clone()
        } else {
            format!("{}/{}", self.directory, self.path)
        }
    }
}

/// A file in a search result together with its matched lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct File {
    /// File identity
    #[serde(flatten)]
    pub header: FileHeader,
    /// Matched and context lines, in file order
    #[serde(default)]
    pub lines: Vec<Line>,
}

/// Response of `/rest/search`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching files, in backend order
    pub files: Vec<File>,
    /// Whether the backend stopped early
    #[serde(default)]
    pub truncated: bool,
    /// Number of hits reported by the backend
    #[serde(default)]
    pub hits: usize,
}

/// Match location inside a fetched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMatch {
    /// 1-based line number
    pub line: u32,
    /// Match range within the line
    pub range: MatchRange,
}

/// Response of `/rest/file`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileResult {
    /// File identity
    #[serde(flatten)]
    pub header: FileHeader,
    /// Full file content
    pub content: String,
    /// Query matches within the content
    #[serde(default)]
    pub matches: Vec<LineMatch>,
}

impl FileResult {
    /// Iterates over `(line_number, text)` pairs, 1-based.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (u32, &str)> {
        self.content.lines().zip(1u32..).map(|(text, n)| (n, text))
    }

    /// Match ranges on the given line.
    pub fn matches_on(&self, line: u32) -> impl Iterator<Item = MatchRange> + '_ {
        self.matches
            .iter()
            .filter(move |m| m.line == line)
            .map(|m| m.range)
    }
}

/// Loading/error/result triple for one backend request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultState<T> {
    /// A request is in flight
    pub loading: bool,
    /// The request failed
    pub error: Option<FetchError>,
    /// The parsed response
    pub result: Option<T>,
}

impl<T> ResultState<T> {
    /// A request has been issued and has not resolved yet.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            loading: true,
            error: None,
            result: None,
        }
    }

    /// The request failed.
    #[must_use]
    pub const fn failed(error: FetchError) -> Self {
        Self {
            loading: false,
            error: Some(error),
            result: None,
        }
    }

    /// The request succeeded.
    #[must_use]
    pub const fn ready(result: T) -> Self {
        Self {
            loading: false,
            error: None,
            result: Some(result),
        }
    }

    /// Builds the resolved state of a request.
    #[must_use]
    pub fn from_result(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => Self::ready(value),
            Err(error) => Self::failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_result() {
        let json = r#"{
            "files": [
                {"path": "src/main.rs", "directory": "repo", "repository": "https://github.com/o/r",
                 "branch": "main", "url": "https://github.com/o/r/blob/main/src/main.rs", "range": [4, 8],
                 "lines": [
                    {"line": "fn main() {", "number": 1, "range": [3, 7]},
                    {"line": "}", "number": 2}
                 ]}
            ],
            "hits": 1,
            "truncated": false
        }"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.files.len(), 1);
        let file = &result.files[0];
        assert_eq!(file.header.path, "src/main.rs");
        assert_eq!(file.header.range, Some((4, 8)));
        assert_eq!(file.lines[0].range, Some((3, 7)));
        assert_eq!(file.lines[1].range, None);
        assert_eq!(file.header.display_path(), "repo/src/main.rs");
    }

    #[test]
    fn test_parse_file_listing_without_lines() {
        let json = r#"{"files":[{"path":"a/b.go"}],"hits":1,"truncated":true}"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert!(result.truncated);
        assert!(result.files[0].lines.is_empty());
        assert_eq!(result.files[0].header.display_path(), "a/b.go");
    }

    #[test]
    fn test_parse_file_result() {
        let json = r#"{"content":"one\ntwo foo\nthree\n","matches":[{"line":2,"range":[4,7]}]}"#;
        let result: FileResult = serde_json::from_str(json).unwrap();
        let lines: Vec<_> = result.numbered_lines().collect();
        assert_eq!(lines, vec![(1, "one"), (2, "two foo"), (3, "three")]);
        assert_eq!(result.matches_on(2).collect::<Vec<_>>(), vec![(4, 7)]);
        assert_eq!(result.matches_on(1).count(), 0);
    }

    #[test]
    fn test_result_state_constructors() {
        let loading: ResultState<u8> = ResultState::loading();
        assert!(loading.loading);

        let failed: ResultState<u8> = ResultState::from_result(Err(FetchError::new(400, "bad")));
        assert!(!failed.loading);
        assert_eq!(failed.error.unwrap().message, "bad");

        let ready = ResultState::from_result(Ok(3u8));
        assert_eq!(ready.result, Some(3));
    }
}
