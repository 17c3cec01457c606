// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Ordered, resumable enumeration over a Lanai Tree.
//!
//! The in-order walk (`smaller`, self, `equal`, `bigger`) is driven by an
//! explicit stack of pending steps rather than native recursion, so deep or
//! degenerate trees cannot exhaust the call stack. Every cursor remembers its
//! starting steps and can be rewound with `reset`.

use std::iter::FusedIterator;

use super::node::NodeId;
use super::LanaiTree;

/// A pending unit of work on the traversal stack.
#[derive(Debug, Clone)]
enum Step {
    /// Expand a node whose key position starts after `prefix`.
    Visit { node: NodeId, prefix: String },
    /// Yield the entry of a final node.
    Emit { node: NodeId, key: String },
}

/// Iterator over `(key, &value)` pairs in key order.
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// The tree being walked
    tree: &'a LanaiTree<V>,

    /// Steps the walk starts from, kept for `reset`
    seed: Vec<Step>,

    /// Pending steps, top of stack is processed next
    stack: Vec<Step>,
}

impl<'a, V> Iter<'a, V> {
    /// Walks the subtree rooted at `node`, prepending `prefix` to every key.
    pub(crate) fn new(tree: &'a LanaiTree<V>, node: Option<NodeId>, prefix: String) -> Self {
        let seed = node
            .map(|node| vec![Step::Visit { node, prefix }])
            .unwrap_or_default();
        Self::from_seed(tree, seed)
    }

    /// Walks every key that starts with the key spelled by `node`: the node
    /// itself if final, then its `equal` subtree.
    pub(crate) fn with_prefix_node(tree: &'a LanaiTree<V>, node: NodeId, prefix: String) -> Self {
        let mut seed = Vec::with_capacity(2);
        if let Some(equal) = tree.node(node).equal {
            seed.push(Step::Visit {
                node: equal,
                prefix: prefix.clone(),
            });
        }
        if tree.node(node).is_final() {
            seed.push(Step::Emit { node, key: prefix });
        }
        Self::from_seed(tree, seed)
    }

    /// An iterator that yields nothing.
    pub(crate) fn empty(tree: &'a LanaiTree<V>) -> Self {
        Self::from_seed(tree, Vec::new())
    }

    fn from_seed(tree: &'a LanaiTree<V>, seed: Vec<Step>) -> Self {
        Self {
            tree,
            stack: seed.clone(),
            seed,
        }
    }

    /// Rewinds the iterator to its first entry.
    pub fn reset(&mut self) {
        self.stack = self.seed.clone();
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(step) = self.stack.pop() {
            match step {
                Step::Emit { node, key } => {
                    if let Some(value) = self.tree.node(node).data.as_ref() {
                        return Some((key, value));
                    }
                }
                Step::Visit { node, prefix } => {
                    let current = self.tree.node(node);
                    let mut key = String::with_capacity(prefix.len() + current.value.len_utf8());
                    key.push_str(&prefix);
                    key.push(current.value);

                    // Pushed in reverse of the order they must be processed
                    if let Some(bigger) = current.bigger {
                        self.stack.push(Step::Visit {
                            node: bigger,
                            prefix: prefix.clone(),
                        });
                    }
                    if let Some(equal) = current.equal {
                        self.stack.push(Step::Visit {
                            node: equal,
                            prefix: key.clone(),
                        });
                    }
                    if current.is_final() {
                        self.stack.push(Step::Emit { node, key });
                    }
                    if let Some(smaller) = current.smaller {
                        self.stack.push(Step::Visit {
                            node: smaller,
                            prefix,
                        });
                    }
                }
            }
        }
        None
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

/// Iterator over keys in order.
#[derive(Debug, Clone)]
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Keys<'a, V> {
    pub(crate) fn new(inner: Iter<'a, V>) -> Self {
        Self { inner }
    }

    /// Rewinds the iterator to the first key.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl<V> Iterator for Keys<'_, V> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

impl<V> FusedIterator for Keys<'_, V> {}

/// Iterator over values in key order.
#[derive(Debug, Clone)]
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(inner: Iter<'a, V>) -> Self {
        Self { inner }
    }

    /// Rewinds the iterator to the first value.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }
}

impl<V> FusedIterator for Values<'_, V> {}

#[cfg(test)]
mod tests {
    use super::super::LanaiTree;

    #[test]
    fn test_iter_is_lazy_and_resettable() {
        let tree = LanaiTree::try_from_pairs([("b", 2), ("a", 1), ("c", 3)]).unwrap();
        let mut iter = tree.iter();

        assert_eq!(iter.next(), Some(("a".to_string(), &1)));
        assert_eq!(iter.next(), Some(("b".to_string(), &2)));

        iter.reset();
        let all: Vec<_> = iter.by_ref().collect();
        assert_eq!(all.len(), 3);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_keys_reset() {
        let tree: LanaiTree<()> = LanaiTree::try_from_keys(["zz", "z", "za"]).unwrap();
        let mut keys = tree.keys();
        assert_eq!(keys.next().as_deref(), Some("z"));
        keys.reset();
        assert_eq!(keys.collect::<Vec<_>>(), vec!["z", "za", "zz"]);
    }

    #[test]
    fn test_empty_tree() {
        let tree: LanaiTree<i32> = LanaiTree::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.values().count(), 0);
    }

    #[test]
    fn test_prefix_subtree_includes_prefix_key() {
        let tree = LanaiTree::try_from_pairs([("car", 1), ("cart", 2), ("cat", 3), ("dog", 4)]).unwrap();
        let entries: Vec<_> = tree.subtree_by_prefix("car").collect();
        assert_eq!(
            entries,
            vec![("car".to_string(), &1), ("cart".to_string(), &2)]
        );

        let mut ca = tree.subtree_by_prefix("ca");
        assert_eq!(ca.by_ref().count(), 3);
        ca.reset();
        assert_eq!(ca.next().map(|(k, _)| k).as_deref(), Some("car"));
    }

    #[test]
    fn test_degenerate_chain_does_not_recurse() {
        // Monotonic insertion turns the root position into a long bigger-chain
        let mut tree = LanaiTree::new();
        for code in 0x100u32..0x100 + 5_000 {
            if let Some(c) = char::from_u32(code) {
                tree.insert(c.to_string(), code).unwrap();
            }
        }
        assert_eq!(tree.keys().count(), tree.len());
    }
}
