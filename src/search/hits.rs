//! Selectable hits within a search result.
//!
//! A hit is a matched line (a line carrying a match range) in one file.
//! Hits are enumerated file by file, and within a file line by line; this
//! order is the navigation order for previous/next selection.

use std::iter::FusedIterator;
use std::slice;

use super::models::{File, FileHeader, Line};

/// Reference to one matched line of one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Hit {
    /// Path relative to `directory`
    pub path: String,
    /// Index directory
    pub directory: String,
    /// Repository URL
    pub repository: String,
    /// Branch name
    pub branch: String,
    /// 1-based line number, 0 for "no particular line"
    pub line: u32,
}

impl Hit {
    /// Creates a hit on `line` of the file described by `header`.
    #[must_use]
    pub fn in_file(header: &FileHeader, line: u32) -> Self {
        Self {
            path: header.path.clone(),
            directory: header.directory.clone(),
            repository: header.repository.clone(),
            branch: header.branch.clone(),
            line,
        }
    }

    /// Returns `true` if this hit points into the file described by `header`.
    ///
    /// Files are identified by directory and path; file responses may lack
    /// repository and branch.
    #[must_use]
    pub fn is_in(&self, header: &FileHeader) -> bool {
        self.path == header.path && self.directory == header.directory
    }

    /// Returns `true` if both hits name the same line of the same file.
    #[must_use]
    pub fn same_line(&self, other: &Self) -> bool {
        self.line == other.line && self.path == other.path && self.directory == other.directory
    }
}

/// Forward-only iterator over the hits of a file list.
///
/// Call [`hits`] again to restart from the first hit.
#[derive(Debug, Clone)]
pub struct Hits<'a> {
    files: slice::Iter<'a, File>,
    current: Option<(&'a File, slice::Iter<'a, Line>)>,
}

/// Enumerates the hits of `files` in navigation order.
#[must_use]
pub fn hits(files: &[File]) -> Hits<'_> {
    Hits {
        files: files.iter(),
        current: None,
    }
}

impl Iterator for Hits<'_> {
    type Item = Hit;

    fn next(&mut self) -> Option<Hit> {
        loop {
            if let Some((file, lines)) = &mut self.current {
                if let Some(line) = lines.find(|line| line.range.is_some()) {
                    return Some(Hit::in_file(&file.header, line.number));
                }
            }
            let file = self.files.next()?;
            self.current = Some((file, file.lines.iter()));
        }
    }
}

impl FusedIterator for Hits<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(number: u32, matched: bool) -> Line {
        Line {
            line: format!("line {number}"),
            number,
            range: matched.then_some((0, 4)),
        }
    }

    fn file(path: &str, lines: Vec<Line>) -> File {
        File {
            header: FileHeader {
                path: path.to_string(),
                ..FileHeader::default()
            },
            lines,
        }
    }

    #[test]
    fn test_hits_follow_file_then_line_order() {
        let files = vec![
            file("a", vec![line(1, true), line(2, false), line(3, true)]),
            file("b", vec![line(2, true)]),
        ];
        let found: Vec<_> = hits(&files).map(|h| (h.path, h.line)).collect();
        assert_eq!(
            found,
            vec![("a".into(), 1), ("a".into(), 3), ("b".into(), 2)]
        );
    }

    #[test]
    fn test_files_without_matched_lines_contribute_nothing() {
        let files = vec![
            file("empty", vec![]),
            file("context", vec![line(5, false)]),
            file("hit", vec![line(9, true)]),
        ];
        let found: Vec<_> = hits(&files).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "hit");
    }

    #[test]
    fn test_iteration_is_restartable() {
        let files = vec![file("a", vec![line(1, true), line(2, true)])];
        let first: Vec<_> = hits(&files).collect();
        let second: Vec<_> = hits(&files).collect();
        assert_eq!(first, second);
        assert!(hits(&[]).next().is_none());
    }

    #[test]
    fn test_hit_identity_includes_directory() {
        let mut header = FileHeader {
            path: "x.rs".to_string(),
            directory: "one".to_string(),
            ..FileHeader::default()
        };
        let hit = Hit::in_file(&header, 3);
        assert!(hit.is_in(&header));
        header.directory = "two".to_string();
        assert!(!hit.is_in(&header));
        assert_ne!(hit, Hit::in_file(&header, 3));
    }

    #[test]
    fn test_location_ignores_repository_and_branch() {
        let searched = FileHeader {
            path: "x.rs".to_string(),
            directory: "one".to_string(),
            repository: "https://github.com/o/r".to_string(),
            branch: "main".to_string(),
            range: None,
        };
        let fetched = FileHeader {
            path: "x.rs".to_string(),
            directory: "one".to_string(),
            ..FileHeader::default()
        };
        let hit = Hit::in_file(&fetched, 3);
        assert!(hit.is_in(&searched));
        assert!(hit.same_line(&Hit::in_file(&searched, 3)));
        assert!(!hit.same_line(&Hit::in_file(&searched, 4)));
    }
}
