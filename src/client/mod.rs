//! HTTP client for the codesearch backend.
//!
//! Requests are blocking and meant to run on worker threads; see
//! [`worker::FetchState`].

pub mod worker;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use crate::search::{FileRequest, FileResult, Filters, SearchResult};

/// Search endpoint, relative to the backend base URL.
pub const SEARCH_ENDPOINT: &str = "/rest/search";

/// File endpoint, relative to the backend base URL.
pub const FILE_ENDPOINT: &str = "/rest/file";

/// A failed backend request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    /// HTTP status code, or 0 when no response was received
    #[serde(default)]
    pub code: u16,
    /// Error message reported by the backend
    pub message: String,
}

impl FetchError {
    /// Creates an error with the given status code and message.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Builds the error for a non-success response.
    ///
    /// JSON bodies contribute their `message` field; anything else is used
    /// verbatim.
    #[must_use]
    pub fn from_response_body(code: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| body.trim().to_string());
        Self::new(code, message)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        let code = error.status().map_or(0, |status| status.as_u16());
        Self::new(code, error.to_string())
    }
}

/// Blocking client bound to one backend.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CodeSearchClient {
    http: reqwest::blocking::Client,
    base_url: Arc<str>,
}

impl CodeSearchClient {
    /// Creates a client for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// Backend base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Prefixes relative URLs with the backend base URL.
    #[must_use]
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }

    /// Fetches `url` and parses the JSON response.
    pub fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let url = self.resolve(url);
        tracing::debug!(%url, "GET");
        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(%url, code = status.as_u16(), "request failed");
            return Err(FetchError::from_response_body(status.as_u16(), &body));
        }
        Ok(response.json()?)
    }

    /// Runs a search.
    pub fn search(&self, filters: &Filters) -> Result<SearchResult, FetchError> {
        self.get(&format!("{SEARCH_ENDPOINT}{}", filters.to_query_string()))
    }

    /// Fetches one file with the matches of the request's query.
    pub fn file(&self, request: &FileRequest) -> Result<FileResult, FetchError> {
        let mut result: FileResult =
            self.get(&format!("{FILE_ENDPOINT}{}", request.to_query_string()))?;
        fill_header_from_path(&mut result, &request.path);
        Ok(result)
    }
}

/// The backend may omit the file identity; derive it from `directory/path`.
fn fill_header_from_path(result: &mut FileResult, full_path: &str) {
    let (directory, path) = full_path.split_once('/').unwrap_or(("", full_path));
    let header = &mut result.header;
    if header.path.is_empty() {
        header.path = path.to_string();
    }
    if header.directory.is_empty() {
        header.directory = directory.to_string();
    }
}

/// Opens a URL in the system browser.
pub fn open_url(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        Command::new("open")
            .arg(url)
            .spawn()
            .context("Failed to open URL")?;
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("Failed to open URL")?;
    }

    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("Failed to open URL")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FileHeader;

    fn client() -> CodeSearchClient {
        CodeSearchClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_resolve() {
        let client = client();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.resolve("/rest/search?q=x"),
            "http://localhost:8080/rest/search?q=x"
        );
        assert_eq!(client.resolve("rest/file"), "http://localhost:8080/rest/file");
        assert_eq!(
            client.resolve("https://example.com/a"),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_error_from_json_body() {
        let error = FetchError::from_response_body(400, r#"{"message":"bad regex"}"#);
        assert_eq!(error, FetchError::new(400, "bad regex"));
        assert_eq!(error.to_string(), "bad regex");
    }

    #[test]
    fn test_error_from_text_body() {
        let error = FetchError::from_response_body(502, "Bad Gateway\n");
        assert_eq!(error.code, 502);
        assert_eq!(error.message, "Bad Gateway");

        let error = FetchError::from_response_body(500, r#"{"other":1}"#);
        assert_eq!(error.message, r#"{"other":1}"#);
    }

    #[test]
    fn test_fill_header_from_path() {
        let mut result = FileResult::default();
        fill_header_from_path(&mut result, "repo/src/main.rs");
        assert_eq!(result.header.directory, "repo");
        assert_eq!(result.header.path, "src/main.rs");

        let mut result = FileResult {
            header: FileHeader {
                path: "kept.rs".to_string(),
                directory: "kept".to_string(),
                ..FileHeader::default()
            },
            ..FileResult::default()
        };
        fill_header_from_path(&mut result, "repo/other.rs");
        assert_eq!(result.header.display_path(), "kept/kept.rs");
    }
}
