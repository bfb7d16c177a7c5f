//! Key labels and key sequences.
//!
//! A [`KeyLabel`] is the canonical name of a single key press (`"a"`, `"G"`,
//! `"Escape"`, `"ArrowDown"`). A [`Sequence`] is the ordered list of labels
//! that must be pressed consecutively to trigger one binding.

use std::fmt;

/// Label of the key that unfocuses text fields.
pub const ESCAPE: &str = "Escape";
/// Label of the Enter key.
pub const ENTER: &str = "Enter";
/// Label of the Tab key.
pub const TAB: &str = "Tab";
/// Label of Shift+Tab.
pub const BACK_TAB: &str = "BackTab";
/// Label of the Backspace key.
pub const BACKSPACE: &str = "Backspace";
/// Label of the Delete key.
pub const DELETE: &str = "Delete";
/// Label of the up arrow.
pub const ARROW_UP: &str = "ArrowUp";
/// Label of the down arrow.
pub const ARROW_DOWN: &str = "ArrowDown";
/// Label of the left arrow.
pub const ARROW_LEFT: &str = "ArrowLeft";
/// Label of the right arrow.
pub const ARROW_RIGHT: &str = "ArrowRight";
/// Label of the Home key.
pub const HOME: &str = "Home";
/// Label of the End key.
pub const END: &str = "End";
/// Label of the Page Up key.
pub const PAGE_UP: &str = "PageUp";
/// Label of the Page Down key.
pub const PAGE_DOWN: &str = "PageDown";

/// Canonical, case-sensitive name of a single key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyLabel(String);

impl KeyLabel {
    /// Creates a label from its canonical name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the label's name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<char> for KeyLabel {
    fn from(c: char) -> Self {
        Self(c.to_string())
    }
}

impl From<&str> for KeyLabel {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl PartialEq<str> for KeyLabel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for KeyLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Ordered list of key labels.
///
/// Converting from `&str` treats every character as its own label, so `"gb"`
/// is `g` then `b`. Named keys such as `Escape` must be given as a list:
/// `["Escape"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sequence(Vec<KeyLabel>);

impl Sequence {
    /// Creates a sequence from labels.
    #[must_use]
    pub fn new(labels: Vec<KeyLabel>) -> Self {
        Self(labels)
    }

    /// Returns the labels in press order.
    #[must_use]
    pub fn labels(&self) -> &[KeyLabel] {
        &self.0
    }

    /// Number of key presses in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence has no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first `len` labels as a new sequence.
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{label}")?;
        }
        Ok(())
    }
}

impl From<&str> for Sequence {
    fn from(keys: &str) -> Self {
        Self(keys.chars().map(KeyLabel::from).collect())
    }
}

impl From<&[&str]> for Sequence {
    fn from(labels: &[&str]) -> Self {
        Self(labels.iter().map(|label| KeyLabel::from(*label)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Sequence {
    fn from(labels: [&str; N]) -> Self {
        Self::from(&labels[..])
    }
}

impl From<Vec<KeyLabel>> for Sequence {
    fn from(labels: Vec<KeyLabel>) -> Self {
        Self(labels)
    }
}

impl From<KeyLabel> for Sequence {
    fn from(label: KeyLabel) -> Self {
        Self(vec![label])
    }
}

impl From<&Sequence> for Sequence {
    fn from(sequence: &Sequence) -> Self {
        sequence.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_splits_into_single_character_labels() {
        let seq = Sequence::from("abc");
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.labels()[0], "a");
        assert_eq!(seq.labels()[2], "c");
    }

    #[test]
    fn test_list_keeps_named_keys_whole() {
        let seq = Sequence::from([ESCAPE]);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.labels()[0], ESCAPE);
    }

    #[test]
    fn test_string_and_list_forms_are_interchangeable() {
        assert_eq!(Sequence::from("abd"), Sequence::from(["a", "b", "d"]));
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_ne!(Sequence::from("g"), Sequence::from("G"));
    }

    #[test]
    fn test_display_joins_with_commas() {
        assert_eq!(Sequence::from("abc").to_string(), "a,b,c");
        assert_eq!(Sequence::from(["c", ARROW_DOWN]).to_string(), "c,ArrowDown");
    }

    #[test]
    fn test_prefix() {
        let seq = Sequence::from("abcd");
        assert_eq!(seq.prefix(2), Sequence::from("ab"));
        assert_eq!(seq.prefix(10), seq);
        assert!(seq.prefix(0).is_empty());
    }
}
