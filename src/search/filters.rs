//! Search filters and their URL query-string form.
//!
//! The parameter names match the backend and the web front end:
//! `q` (query), `f` (file), `xf` (exclude file), `i` (case-insensitive),
//! `b`/`a` (context lines before/after).

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const QP_QUERY: &str = "q";
const QP_FILE: &str = "f";
const QP_EXCLUDE_FILE: &str = "xf";
const QP_CASE_INSENSITIVE: &str = "i";
const QP_LINES_BEFORE: &str = "b";
const QP_LINES_AFTER: &str = "a";
const QP_PATH: &str = "p";

/// Exclude-file pattern that hides test sources.
pub const TEST_FILE_REGEX: &str = r"/tests?/|_tests?\b|Tests?[^a-z]|/systemtests/|\.html$";

/// Values of the search form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filters {
    /// Regular expression matched against file content
    pub query: String,
    /// Regular expression a file path must match
    pub file: String,
    /// Regular expression a file path must not match
    pub exclude_file: String,
    /// Match case-insensitively
    pub case_insensitive: bool,
    /// Context lines shown before each match
    pub num_lines_before: u32,
    /// Context lines shown after each match
    pub num_lines_after: u32,
}

impl Filters {
    /// Parses filters from a query string such as `?q=foo&i=true`.
    ///
    /// Unknown parameters are ignored and numbers that fail to parse fall
    /// back to 0.
    #[must_use]
    pub fn from_query_string(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut filters = Self::default();
        for (key, value) in form_urlencoded::parse(search.as_bytes()) {
            match key.as_ref() {
                QP_QUERY => filters.query = value.into_owned(),
                QP_FILE => filters.file = value.into_owned(),
                QP_EXCLUDE_FILE => filters.exclude_file = value.into_owned(),
                QP_CASE_INSENSITIVE => filters.case_insensitive = value == "true",
                QP_LINES_BEFORE => filters.num_lines_before = value.parse().unwrap_or(0),
                QP_LINES_AFTER => filters.num_lines_after = value.parse().unwrap_or(0),
                _ => {}
            }
        }
        filters
    }

    /// Serializes the filters, omitting empty and default values.
    ///
    /// Returns an empty string when every value is default, otherwise a
    /// string starting with `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        if !self.query.is_empty() {
            params.append_pair(QP_QUERY, &self.query);
        }
        if !self.file.is_empty() {
            params.append_pair(QP_FILE, &self.file);
        }
        if !self.exclude_file.is_empty() {
            params.append_pair(QP_EXCLUDE_FILE, &self.exclude_file);
        }
        if self.case_insensitive {
            params.append_pair(QP_CASE_INSENSITIVE, "true");
        }
        if self.num_lines_before != 0 {
            params.append_pair(QP_LINES_BEFORE, &self.num_lines_before.to_string());
        }
        if self.num_lines_after != 0 {
            params.append_pair(QP_LINES_AFTER, &self.num_lines_after.to_string());
        }
        prefixed(params.finish())
    }

    /// The backend rejects requests without a query or a file filter.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        !self.query.is_empty() || !self.file.is_empty()
    }

    /// Flips the exclude-file filter between empty and [`TEST_FILE_REGEX`].
    pub fn toggle_test_file_exclusion(&mut self) {
        if self.exclude_file == TEST_FILE_REGEX {
            self.exclude_file.clear();
        } else {
            self.exclude_file = TEST_FILE_REGEX.to_string();
        }
    }
}

/// Parameters of a `/rest/file` request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileRequest {
    /// `directory/path` of the file
    pub path: String,
    /// Query whose matches should be reported
    pub query: String,
    /// Match case-insensitively
    pub case_insensitive: bool,
}

impl FileRequest {
    /// Requests `path` with the matches of the current filters.
    #[must_use]
    pub fn new(path: impl Into<String>, filters: &Filters) -> Self {
        Self {
            path: path.into(),
            query: filters.query.clone(),
            case_insensitive: filters.case_insensitive,
        }
    }

    /// Serializes the request parameters.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair(QP_PATH, &self.path);
        if !self.query.is_empty() {
            params.append_pair(QP_QUERY, &self.query);
        }
        if self.case_insensitive {
            params.append_pair(QP_CASE_INSENSITIVE, "true");
        }
        prefixed(params.finish())
    }
}

fn prefixed(params: String) -> String {
    if params.is_empty() {
        params
    } else {
        format!("?{params}")
    }
}
