//! Keyboard shortcut recognition.
//!
//! Bindings are stored in a prefix trie ([`trie`]) and key presses are matched
//! against it one at a time by the [`KeySequenceDispatcher`].

pub mod dispatcher;
pub mod sequence;
pub mod trie;

pub use dispatcher::{KeyOutcome, KeyPress, KeySequenceDispatcher, Modifiers, SEQUENCE_TIMEOUT};
pub use sequence::{KeyLabel, Sequence};
pub use trie::{BindError, BindingTrie, NodeId};
