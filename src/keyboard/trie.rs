//! Prefix trie of bound key sequences.
//!
//! Every node is either a [`Leaf`](Node::Leaf) holding the bound value or a
//! [`Branch`](Node::Branch) mapping the next key label to a child. A sequence
//! can therefore never be both a complete binding and a strict prefix of
//! another one. Nodes live in a [`Slab`] arena and are addressed by
//! [`NodeId`].

use slab::Slab;
use std::collections::HashMap;
use thiserror::Error;

use super::sequence::{KeyLabel, Sequence};

/// Handle to a node inside a [`BindingTrie`].
///
/// Ids are only meaningful until the next `insert` or `remove`; removed slots
/// are reused by the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Errors raised while changing bindings.
///
/// These indicate two features fighting over the same shortcut and are
/// reported at setup time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Tried to bind or unbind a sequence with no keys.
    #[error("Cannot bind an empty key sequence")]
    EmptySequence,

    /// A strict prefix of the sequence already triggers a binding.
    #[error("Cannot bind sequence {sequence}: {prefix} already bound")]
    ConflictingPrefix {
        /// Sequence being bound
        sequence: Sequence,
        /// Shorter sequence that is already bound
        prefix: Sequence,
    },

    /// Longer sequences starting with this one are already bound.
    #[error("Other sequence starting with {sequence} already bound")]
    PrefixOfExisting {
        /// Sequence being bound
        sequence: Sequence,
    },

    /// The exact sequence is already bound.
    #[error("Sequence {sequence} already bound")]
    AlreadyBound {
        /// Sequence being bound
        sequence: Sequence,
    },

    /// No binding exists at exactly this sequence.
    #[error("Cannot unbind missing sequence {sequence}")]
    NotBound {
        /// Sequence being unbound
        sequence: Sequence,
    },
}

#[derive(Debug)]
enum Node<A> {
    Leaf(A),
    Branch(HashMap<KeyLabel, usize>),
}

/// Trie from key sequences to bound values.
#[derive(Debug)]
pub struct BindingTrie<A> {
    nodes: Slab<Node<A>>,
    root: usize,
    bindings: usize,
}

impl<A> BindingTrie<A> {
    /// Creates an empty trie.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let root = nodes.insert(Node::Branch(HashMap::new()));
        Self {
            nodes,
            root,
            bindings: 0,
        }
    }

    /// The root node, where every sequence starts.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(self.root)
    }

    /// Follows the edge labelled `label` out of `node`.
    #[must_use]
    pub fn child(&self, node: NodeId, label: &KeyLabel) -> Option<NodeId> {
        match self.nodes.get(node.0)? {
            Node::Branch(children) => children.get(label).copied().map(NodeId),
            Node::Leaf(_) => None,
        }
    }

    /// Returns the value bound at `node`, if `node` completes a sequence.
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<&A> {
        match self.nodes.get(node.0)? {
            Node::Leaf(value) => Some(value),
            Node::Branch(_) => None,
        }
    }

    /// Returns the value bound to exactly `sequence`.
    #[must_use]
    pub fn get(&self, sequence: &Sequence) -> Option<&A> {
        let mut node = self.root();
        for label in sequence.labels() {
            node = self.child(node, label)?;
        }
        self.value(node)
    }

    /// Returns `true` if exactly `sequence` is bound.
    #[must_use]
    pub fn contains(&self, sequence: &Sequence) -> bool {
        self.get(sequence).is_some()
    }

    /// Number of bound sequences.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bindings
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bindings == 0
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Binds `sequence` to `value`.
    ///
    /// The trie is left untouched when an error is returned.
    pub fn insert(&mut self, sequence: &Sequence, value: A) -> Result<(), BindError> {
        let labels = sequence.labels();
        if labels.is_empty() {
            return Err(BindError::EmptySequence);
        }

        // Walk the existing part of the path before creating anything
        let mut node = self.root;
        let mut depth = 0;
        while depth < labels.len() {
            let Some(next) = self.branch_child(node, &labels[depth]) else {
                break;
            };
            let is_last = depth + 1 == labels.len();
            match &self.nodes[next] {
                Node::Leaf(_) if is_last => {
                    return Err(BindError::AlreadyBound {
                        sequence: sequence.clone(),
                    });
                }
                Node::Leaf(_) => {
                    return Err(BindError::ConflictingPrefix {
                        sequence: sequence.clone(),
                        prefix: sequence.prefix(depth + 1),
                    });
                }
                Node::Branch(_) if is_last => {
                    return Err(BindError::PrefixOfExisting {
                        sequence: sequence.clone(),
                    });
                }
                Node::Branch(_) => {}
            }
            node = next;
            depth += 1;
        }

        let last = labels.len() - 1;
        for label in &labels[depth..last] {
            let child = self.nodes.insert(Node::Branch(HashMap::new()));
            self.attach(node, label, child);
            node = child;
        }
        let leaf = self.nodes.insert(Node::Leaf(value));
        self.attach(node, &labels[last], leaf);

        self.bindings += 1;
        Ok(())
    }

    /// Removes the binding at exactly `sequence` and returns its value.
    ///
    /// Branches left without children are pruned back toward the root.
    pub fn remove(&mut self, sequence: &Sequence) -> Result<A, BindError> {
        let not_bound = || BindError::NotBound {
            sequence: sequence.clone(),
        };

        let mut path = Vec::with_capacity(sequence.len() + 1);
        path.push(self.root);
        for label in sequence.labels() {
            let parent = path[path.len() - 1];
            let child = self.branch_child(parent, label).ok_or_else(not_bound)?;
            path.push(child);
        }

        let leaf = path[path.len() - 1];
        if leaf == self.root || !matches!(self.nodes[leaf], Node::Leaf(_)) {
            return Err(not_bound());
        }

        let Node::Leaf(value) = self.nodes.remove(leaf) else {
            return Err(not_bound());
        };
        self.bindings -= 1;

        // Detach the leaf, then every ancestor branch that became empty
        for (depth, label) in sequence.labels().iter().enumerate().rev() {
            let parent = path[depth];
            let parent_now_empty = match &mut self.nodes[parent] {
                Node::Branch(children) => {
                    children.remove(label);
                    children.is_empty()
                }
                Node::Leaf(_) => false,
            };
            if !parent_now_empty || parent == self.root {
                break;
            }
            self.nodes.remove(parent);
        }

        Ok(value)
    }

    fn attach(&mut self, parent: usize, label: &KeyLabel, child: usize) {
        if let Node::Branch(children) = &mut self.nodes[parent] {
            children.insert(label.clone(), child);
        }
    }

    fn branch_child(&self, node: usize, label: &KeyLabel) -> Option<usize> {
        match &self.nodes[node] {
            Node::Branch(children) => children.get(label).copied(),
            Node::Leaf(_) => None,
        }
    }
}

impl<A> Default for BindingTrie<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> Sequence {
        Sequence::from(s)
    }

    #[test]
    fn test_bind_shared_prefixes() {
        let mut trie = BindingTrie::new();
        trie.insert(&seq("abc"), 1).unwrap();
        trie.insert(&seq("d"), 2).unwrap();
        trie.insert(&Sequence::from(["a", "b", "d"]), 3).unwrap();

        assert_eq!(trie.get(&seq("abc")), Some(&1));
        assert_eq!(trie.get(&seq("d")), Some(&2));
        assert_eq!(trie.get(&seq("abd")), Some(&3));
        assert_eq!(trie.get(&seq("ab")), None);
        assert_eq!(trie.len(), 3);
        // root, a, b, c, d (under b), d (under root)
        assert_eq!(trie.node_count(), 6);
    }

    #[test]
    fn test_unbind_prunes_empty_branches() {
        let mut trie = BindingTrie::new();
        trie.insert(&seq("abc"), 1).unwrap();
        trie.insert(&seq("d"), 2).unwrap();
        trie.insert(&seq("abd"), 3).unwrap();

        assert_eq!(trie.remove(&seq("abc")), Ok(1));
        assert!(!trie.contains(&seq("abc")));
        assert!(trie.contains(&seq("abd")));
        assert_eq!(trie.node_count(), 5);

        assert_eq!(trie.remove(&seq("abd")), Ok(3));
        let root = trie.root();
        assert_eq!(trie.child(root, &KeyLabel::from('a')), None);
        assert_eq!(trie.node_count(), 2);

        assert_eq!(trie.remove(&seq("d")), Ok(2));
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn test_shorter_sequence_after_longer_fails() {
        let mut trie = BindingTrie::new();
        trie.insert(&seq("abc"), 1).unwrap();
        assert_eq!(
            trie.insert(&seq("ab"), 2),
            Err(BindError::PrefixOfExisting {
                sequence: seq("ab")
            })
        );
    }

    #[test]
    fn test_longer_sequence_after_shorter_fails() {
        let mut trie = BindingTrie::new();
        trie.insert(&seq("abc"), 1).unwrap();
        let err = trie.insert(&seq("abcd"), 2).unwrap_err();
        assert_eq!(
            err,
            BindError::ConflictingPrefix {
                sequence: seq("abcd"),
                prefix: seq("abc"),
            }
        );
        assert_eq!(err.to_string(), "Cannot bind sequence a,b,c,d: a,b,c already bound");
    }

    #[test]
    fn test_failed_bind_leaves_trie_untouched() {
        let mut trie = BindingTrie::new();
        trie.insert(&seq("ab"), 1).unwrap();
        let before = trie.node_count();
        assert!(trie.insert(&seq("abxyz"), 2).is_err());
        assert!(trie.insert(&seq("a"), 3).is_err());
        assert_eq!(trie.node_count(), before);
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_rebinding_same_sequence_fails() {
        let mut trie = BindingTrie::new();
        trie.insert(&seq("x"), 1).unwrap();
        assert!(matches!(
            trie.insert(&seq("x"), 2),
            Err(BindError::AlreadyBound { .. })
        ));
        assert_eq!(trie.get(&seq("x")), Some(&1));
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let mut trie: BindingTrie<u8> = BindingTrie::new();
        assert_eq!(trie.insert(&seq(""), 1), Err(BindError::EmptySequence));
        assert!(matches!(
            trie.remove(&seq("")),
            Err(BindError::NotBound { .. })
        ));
    }

    #[test]
    fn test_unbind_missing_or_partial_sequence_fails() {
        let mut trie = BindingTrie::new();
        trie.insert(&seq("abc"), 1).unwrap();

        let err = trie.remove(&seq("ab")).unwrap_err();
        assert_eq!(err.to_string(), "Cannot unbind missing sequence a,b");
        assert!(trie.remove(&seq("zz")).is_err());
        assert!(trie.remove(&seq("abcd")).is_err());
        assert!(trie.contains(&seq("abc")));
    }

    #[test]
    fn test_slots_are_reused_after_removal() {
        let mut trie = BindingTrie::new();
        trie.insert(&seq("ab"), 1).unwrap();
        trie.remove(&seq("ab")).unwrap();
        trie.insert(&seq("cd"), 2).unwrap();
        assert_eq!(trie.get(&seq("cd")), Some(&2));
        assert_eq!(trie.node_count(), 3);
    }
}
