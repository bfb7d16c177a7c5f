//! Multi-key sequence dispatcher.
//!
//! Resolves key presses one at a time against a [`BindingTrie`], keeping a
//! walk pointer between presses. A sequence is abandoned when more than
//! [`SEQUENCE_TIMEOUT`] passes between two presses, when a key with a
//! modifier is pressed, or when no binding continues with the pressed key.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

use super::sequence::{self, KeyLabel, Sequence};
use super::trie::{BindError, BindingTrie, NodeId};

/// Longest pause allowed between two presses of the same sequence.
pub const SEQUENCE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Modifier keys that disqualify a press from matching any binding.
///
/// Shift is deliberately absent: shifted characters arrive as their own label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Alt/Option held
    pub alt: bool,
    /// Control held
    pub ctrl: bool,
    /// Meta/Super/Command held
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        alt: false,
        ctrl: false,
        meta: false,
    };

    /// Returns `true` if any modifier is held.
    #[must_use]
    pub const fn any(self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

/// A single key press as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Canonical key label
    pub label: KeyLabel,
    /// Modifier state at the time of the press
    pub modifiers: Modifiers,
    /// Whether a text field had focus when the key was pressed
    pub typing: bool,
}

impl KeyPress {
    /// Creates an unmodified press outside of any text field.
    #[must_use]
    pub fn new(label: impl Into<KeyLabel>) -> Self {
        Self {
            label: label.into(),
            modifiers: Modifiers::NONE,
            typing: false,
        }
    }

    /// Marks the press as having Control held.
    #[must_use]
    pub const fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    /// Marks the press as having Alt held.
    #[must_use]
    pub const fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    /// Marks the press as happening while a text field has focus.
    #[must_use]
    pub const fn while_typing(mut self) -> Self {
        self.typing = true;
        self
    }

    /// Converts a terminal key event.
    ///
    /// Returns `None` for key releases and for keys that have no label.
    #[must_use]
    pub fn from_crossterm(event: &KeyEvent, typing: bool) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let label = label_for(event.code)?;
        Some(Self {
            label,
            modifiers: Modifiers {
                alt: event.modifiers.contains(KeyModifiers::ALT),
                ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
                meta: event
                    .modifiers
                    .intersects(KeyModifiers::SUPER | KeyModifiers::META),
            },
            typing,
        })
    }
}

/// Maps a terminal key code to its canonical label.
#[must_use]
pub fn label_for(code: KeyCode) -> Option<KeyLabel> {
    let label = match code {
        KeyCode::Char(c) => return Some(KeyLabel::from(c)),
        KeyCode::Esc => sequence::ESCAPE,
        KeyCode::Enter => sequence::ENTER,
        KeyCode::Tab => sequence::TAB,
        KeyCode::BackTab => sequence::BACK_TAB,
        KeyCode::Backspace => sequence::BACKSPACE,
        KeyCode::Delete => sequence::DELETE,
        KeyCode::Up => sequence::ARROW_UP,
        KeyCode::Down => sequence::ARROW_DOWN,
        KeyCode::Left => sequence::ARROW_LEFT,
        KeyCode::Right => sequence::ARROW_RIGHT,
        KeyCode::Home => sequence::HOME,
        KeyCode::End => sequence::END,
        KeyCode::PageUp => sequence::PAGE_UP,
        KeyCode::PageDown => sequence::PAGE_DOWN,
        KeyCode::F(n) => return Some(KeyLabel::new(format!("F{n}"))),
        _ => return None,
    };
    Some(KeyLabel::from(label))
}

/// Result of feeding one key press to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome<A> {
    /// The press was not considered at all (no listener, typing, or modifier).
    Ignored,
    /// The press matched nothing; the walk is back at the root.
    Unmatched,
    /// The press advanced a sequence that needs more keys.
    Pending,
    /// The press completed a sequence. The key is consumed and the caller
    /// runs the bound action.
    Fired(A),
}

/// Owns the binding trie and the walk state between key presses.
#[derive(Debug)]
pub struct KeySequenceDispatcher<A> {
    trie: BindingTrie<A>,
    current: NodeId,
    last_key_at: Option<Instant>,
    timeout: Duration,
    escape: KeyLabel,
    listening: bool,
}

impl<A: Clone> KeySequenceDispatcher<A> {
    /// Creates a dispatcher with no bindings and no listener attached.
    #[must_use]
    pub fn new() -> Self {
        let trie = BindingTrie::new();
        let current = trie.root();
        Self {
            trie,
            current,
            last_key_at: None,
            timeout: SEQUENCE_TIMEOUT,
            escape: KeyLabel::from(sequence::ESCAPE),
            listening: false,
        }
    }

    /// Returns `true` while at least one binding exists.
    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.listening
    }

    /// Read access to the bindings.
    #[must_use]
    pub const fn bindings(&self) -> &BindingTrie<A> {
        &self.trie
    }

    /// Returns `true` if a sequence is partially entered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.current != self.trie.root()
    }

    /// Binds `sequence` to `action`.
    pub fn bind(&mut self, sequence: impl Into<Sequence>, action: A) -> Result<(), BindError> {
        let sequence = sequence.into();
        self.trie.insert(&sequence, action)?;
        self.current = self.trie.root();
        if !self.listening {
            self.listening = true;
            tracing::debug!("keydown listener attached");
        }
        Ok(())
    }

    /// Removes the binding for `sequence` and returns its action.
    pub fn unbind(&mut self, sequence: impl Into<Sequence>) -> Result<A, BindError> {
        let sequence = sequence.into();
        let action = self.trie.remove(&sequence)?;
        self.current = self.trie.root();
        if self.trie.is_empty() && self.listening {
            self.listening = false;
            tracing::debug!("keydown listener detached");
        }
        Ok(action)
    }

    /// Feeds one key press, pressed at `now`, through the trie.
    pub fn handle_key(&mut self, press: &KeyPress, now: Instant) -> KeyOutcome<A> {
        if !self.listening {
            return KeyOutcome::Ignored;
        }

        // Text fields swallow everything except the key that leaves them
        if press.typing && press.label != self.escape {
            return KeyOutcome::Ignored;
        }

        // A modified press never counts toward a sequence and breaks one in progress
        if press.modifiers.any() {
            self.last_key_at = None;
            return KeyOutcome::Ignored;
        }

        let root = self.trie.root();
        let expired = self
            .last_key_at
            .is_none_or(|last| now.saturating_duration_since(last) > self.timeout);
        if expired {
            self.current = root;
        }
        self.last_key_at = Some(now);

        self.current = self
            .trie
            .child(self.current, &press.label)
            .or_else(|| self.trie.child(root, &press.label))
            .unwrap_or(root);

        if let Some(action) = self.trie.value(self.current) {
            let action = action.clone();
            self.current = root;
            tracing::trace!(key = %press.label, "key sequence completed");
            return KeyOutcome::Fired(action);
        }

        if self.current == root {
            KeyOutcome::Unmatched
        } else {
            KeyOutcome::Pending
        }
    }
}

impl<A: Clone> Default for KeySequenceDispatcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_attached_once_and_detached_when_empty() {
        let mut dispatcher = KeySequenceDispatcher::new();
        assert!(!dispatcher.is_listening());

        dispatcher.bind("a", 1).unwrap();
        dispatcher.bind("b", 2).unwrap();
        assert!(dispatcher.is_listening());

        dispatcher.unbind("a").unwrap();
        assert!(dispatcher.is_listening());
        dispatcher.unbind("b").unwrap();
        assert!(!dispatcher.is_listening());

        // Interleaving re-attaches
        dispatcher.bind("c", 3).unwrap();
        assert!(dispatcher.is_listening());
    }

    #[test]
    fn test_failed_bind_does_not_attach_listener() {
        let mut dispatcher: KeySequenceDispatcher<u8> = KeySequenceDispatcher::new();
        assert!(dispatcher.bind("", 1).is_err());
        assert!(!dispatcher.is_listening());
    }

    #[test]
    fn test_detached_dispatcher_ignores_keys() {
        let mut dispatcher: KeySequenceDispatcher<u8> = KeySequenceDispatcher::new();
        let outcome = dispatcher.handle_key(&KeyPress::new('a'), Instant::now());
        assert_eq!(outcome, KeyOutcome::Ignored);
    }

    #[test]
    fn test_typing_suppresses_everything_but_escape() {
        let mut dispatcher = KeySequenceDispatcher::new();
        dispatcher.bind("q", "focus").unwrap();
        dispatcher.bind([sequence::ESCAPE], "unfocus").unwrap();
        let now = Instant::now();

        let typed_q = KeyPress::new('q').while_typing();
        assert_eq!(dispatcher.handle_key(&typed_q, now), KeyOutcome::Ignored);

        let typed_esc = KeyPress::new(sequence::ESCAPE).while_typing();
        assert_eq!(
            dispatcher.handle_key(&typed_esc, now),
            KeyOutcome::Fired("unfocus")
        );
    }

    #[test]
    fn test_pending_then_fired() {
        let mut dispatcher = KeySequenceDispatcher::new();
        dispatcher.bind("gb", 7).unwrap();
        let now = Instant::now();

        assert_eq!(dispatcher.handle_key(&KeyPress::new('g'), now), KeyOutcome::Pending);
        assert!(dispatcher.is_pending());
        assert_eq!(dispatcher.handle_key(&KeyPress::new('b'), now), KeyOutcome::Fired(7));
        assert!(!dispatcher.is_pending());
    }

    #[test]
    fn test_unknown_key_returns_to_root() {
        let mut dispatcher = KeySequenceDispatcher::new();
        dispatcher.bind("gb", 7).unwrap();
        let now = Instant::now();

        dispatcher.handle_key(&KeyPress::new('g'), now);
        assert_eq!(dispatcher.handle_key(&KeyPress::new('z'), now), KeyOutcome::Unmatched);
        assert_eq!(dispatcher.handle_key(&KeyPress::new('b'), now), KeyOutcome::Unmatched);
    }

    #[test]
    fn test_non_continuation_key_restarts_from_root() {
        let mut dispatcher = KeySequenceDispatcher::new();
        dispatcher.bind("ab", 1).unwrap();
        dispatcher.bind("cd", 2).unwrap();
        let now = Instant::now();

        dispatcher.handle_key(&KeyPress::new('a'), now);
        // 'c' does not continue "a", but it starts "cd"
        assert_eq!(dispatcher.handle_key(&KeyPress::new('c'), now), KeyOutcome::Pending);
        assert_eq!(dispatcher.handle_key(&KeyPress::new('d'), now), KeyOutcome::Fired(2));
    }

    #[test]
    fn test_unbind_resets_walk() {
        let mut dispatcher = KeySequenceDispatcher::new();
        dispatcher.bind("ab", 1).unwrap();
        dispatcher.bind("x", 2).unwrap();
        let now = Instant::now();

        dispatcher.handle_key(&KeyPress::new('a'), now);
        dispatcher.unbind("ab").unwrap();
        assert!(!dispatcher.is_pending());
        assert_eq!(dispatcher.handle_key(&KeyPress::new('b'), now), KeyOutcome::Unmatched);
    }

    #[test]
    fn test_label_for_named_keys() {
        assert_eq!(label_for(KeyCode::Esc).unwrap(), sequence::ESCAPE);
        assert_eq!(label_for(KeyCode::Down).unwrap(), sequence::ARROW_DOWN);
        assert_eq!(label_for(KeyCode::Char('G')).unwrap(), "G");
        assert_eq!(label_for(KeyCode::F(5)).unwrap(), "F5");
        assert!(label_for(KeyCode::CapsLock).is_none());
    }

    #[test]
    fn test_from_crossterm() {
        let event = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        let press = KeyPress::from_crossterm(&event, false).unwrap();
        assert_eq!(press.label, "G");
        assert!(!press.modifiers.any());

        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let press = KeyPress::from_crossterm(&event, true).unwrap();
        assert!(press.modifiers.ctrl);
        assert!(press.typing);

        let mut event = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert!(KeyPress::from_crossterm(&event, false).is_none());
    }
}
