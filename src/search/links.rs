//! Navigation targets derived from the selected hit.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::filters::Filters;
use super::hits::Hit;

const FILE_ROUTE_PREFIX: &str = "/file/";

static LINE_ANCHOR: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^#L(\d+)$"));

/// Where a link on a hit leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    /// The file view of this application
    FileView,
    /// The file on GitHub
    GithubBlob,
    /// Blame of the file on GitHub
    GithubBlame,
    /// Commit history of the file on GitHub
    GithubHistory,
}

impl LinkTarget {
    /// All targets, in help order.
    pub const ALL: [Self; 4] = [
        Self::FileView,
        Self::GithubBlob,
        Self::GithubBlame,
        Self::GithubHistory,
    ];

    /// Key that opens the target in place. The uppercase key copies the URL.
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::FileView => 'o',
            Self::GithubBlob => 'g',
            Self::GithubBlame => 'b',
            Self::GithubHistory => 'h',
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FileView => "file view",
            Self::GithubBlob => "GitHub",
            Self::GithubBlame => "GitHub blame",
            Self::GithubHistory => "GitHub history",
        }
    }

    /// Builds the URL of this target for `hit`.
    ///
    /// The file view URL is a path within the app; GitHub URLs are absolute.
    #[must_use]
    pub fn url(self, hit: &Hit) -> String {
        let anchor = path_anchor(hit);
        let view = match self {
            Self::FileView => return format!("{FILE_ROUTE_PREFIX}{}/{anchor}", hit.directory),
            Self::GithubBlob => "blob",
            Self::GithubBlame => "blame",
            Self::GithubHistory => "commits",
        };
        format!("{}/{view}/{}/{anchor}", hit.repository, hit.branch)
    }
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `path#Lline`, or just `path` when the hit has no line.
#[must_use]
pub fn path_anchor(hit: &Hit) -> String {
    if hit.line == 0 {
        hit.path.clone()
    } else {
        format!("{}#L{}", hit.path, hit.line)
    }
}

/// Returns `true` for URLs that leave the application.
#[must_use]
pub fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Page of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The search page with its form values
    Search(Filters),
    /// The file view
    File {
        /// `directory/path` of the file
        path: String,
        /// Line anchor
        line: Option<u32>,
    },
}

impl Default for Route {
    fn default() -> Self {
        Self::Search(Filters::default())
    }
}

impl Route {
    /// Parses an in-app URL such as `/?q=foo` or `/file/dir/a.rs#L12`.
    ///
    /// Anything that is not a file route is the search page.
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.find('#') {
            Some(index) => url.split_at(index),
            None => (url, ""),
        };
        let (path, query) = match rest.find('?') {
            Some(index) => rest.split_at(index),
            None => (rest, ""),
        };

        match path.strip_prefix(FILE_ROUTE_PREFIX) {
            Some(file) if !file.is_empty() => Self::File {
                path: file.to_string(),
                line: parse_line_anchor(fragment),
            },
            _ => Self::Search(Filters::from_query_string(query)),
        }
    }

    /// Renders the route back into an in-app URL.
    #[must_use]
    pub fn to_url(&self) -> String {
        match self {
            Self::Search(filters) => format!("/{}", filters.to_query_string()),
            Self::File { path, line: Some(line) } => format!("{FILE_ROUTE_PREFIX}{path}#L{line}"),
            Self::File { path, line: None } => format!("{FILE_ROUTE_PREFIX}{path}"),
        }
    }
}

fn parse_line_anchor(fragment: &str) -> Option<u32> {
    let regex = LINE_ANCHOR.as_ref().ok()?;
    regex
        .captures(fragment)
        .and_then(|captures| captures.get(1))
        .and_then(|number| number.as_str().parse().ok())
}
