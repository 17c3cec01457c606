// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Lanai Tree Implementation
//!
//! An ordered map from string keys to values built on a ternary search tree,
//! with a pattern matcher that walks the tree instead of scanning a key list.
//!
//! Every node stores one character and three links: `smaller` and `bigger`
//! lead to alternative characters at the same key position, `equal` leads to
//! the next position. Shared prefixes are stored once, and a pattern query
//! only descends into subtrees whose characters can still satisfy the pattern.
//!
//! # Example
//!
//! ```
//! use lanai_lib::data_structures::lanai_tree::LanaiTree;
//!
//! let mut tree = LanaiTree::new();
//! for (key, value) in [("zero", 0), ("one", 1), ("two", 2), ("three", 3), ("four", 4)] {
//!     tree.insert(key, value).unwrap();
//! }
//!
//! let keys: Vec<String> = tree.keys().collect();
//! assert_eq!(keys, vec!["four", "one", "three", "two", "zero"]);
//!
//! let matches = tree.match_pattern("t.*").unwrap();
//! assert_eq!(matches.into_iter().collect::<Vec<_>>(), vec!["three", "two"]);
//! ```
//!
//! # Performance Characteristics
//!
//! - Insert, lookup and remove: O(k + s) where k is the key length and s the
//!   number of sibling hops; the tree never rebalances, so monotonic insertion
//!   order degrades sibling chains into lists.
//! - Ordered enumeration: O(n), driven by an explicit stack.
//! - `nth_key`: O(n). It walks the tree from the start on every call.

mod cursor;
mod error;
mod node;
pub mod pattern;

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, trace};

pub use cursor::{Iter, Keys, Values};
pub use error::{LanaiTreeError, LanaiTreeResult};
pub use node::{Link, Node, NodeId};
pub use pattern::{MatchMode, Pattern};

/// Default upper bound on key length, in characters.
pub const DEFAULT_MAX_KEY_LENGTH: usize = 4096;

/// Default upper bound on pattern length, in characters.
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 1024;

/// Configuration options for the Lanai Tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanaiTreeConfig {
    /// Longest key accepted by `insert` (bounds the matcher's recursion depth)
    pub max_key_length: usize,

    /// Longest pattern accepted by `match_pattern` and `match_contains`
    pub max_pattern_length: usize,

    /// Mode used by `match_pattern`
    pub default_mode: MatchMode,
}

impl Default for LanaiTreeConfig {
    fn default() -> Self {
        Self {
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
            default_mode: MatchMode::Anchored,
        }
    }
}

impl LanaiTreeConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the longest key accepted by the tree.
    pub fn with_max_key_length(mut self, max_key_length: usize) -> Self {
        self.max_key_length = max_key_length;
        self
    }

    /// Sets the longest pattern accepted by the tree's pattern queries.
    pub fn with_max_pattern_length(mut self, max_pattern_length: usize) -> Self {
        self.max_pattern_length = max_pattern_length;
        self
    }

    /// Sets the mode used by `match_pattern`.
    pub fn with_default_mode(mut self, mode: MatchMode) -> Self {
        self.default_mode = mode;
        self
    }
}

/// Lanai Tree is an ordered map from non-empty string keys to values.
///
/// Key features:
/// * Keys enumerate in strictly increasing order by character value
/// * Common prefixes are shared between keys
/// * Pattern queries are evaluated against the tree structure
/// * Removal prunes nodes that no longer lead to any key
///
/// Nodes live in an arena and link to each other by index. Slots released by
/// pruning are kept on a free list and reused by later insertions.
#[derive(Clone)]
pub struct LanaiTree<V> {
    /// Node arena; released slots are listed in `free`
    nodes: Vec<Node<V>>,

    /// Released arena slots available for reuse
    free: Vec<NodeId>,

    /// The root node, absent while the tree is empty
    root: Option<NodeId>,

    /// Number of stored keys
    len: usize,

    /// Configuration options
    config: LanaiTreeConfig,
}

impl<V> LanaiTree<V> {
    /// Creates a new empty `LanaiTree` with default configuration.
    pub fn new() -> Self {
        Self::with_config(LanaiTreeConfig::default())
    }

    /// Creates a new empty `LanaiTree` with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the tree.
    pub fn with_config(config: LanaiTreeConfig) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            config,
        }
    }

    /// Builds a tree from key/value pairs, failing on the first invalid or
    /// duplicate key.
    pub fn try_from_pairs<I, K>(pairs: I) -> LanaiTreeResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
    {
        let mut tree = Self::new();
        for (key, value) in pairs {
            tree.insert(key, value)?;
        }
        Ok(tree)
    }

    /// Returns the tree's configuration.
    pub fn config(&self) -> &LanaiTreeConfig {
        &self.config
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes in the arena.
    ///
    /// Drops back to zero once every key has been removed.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Removes every key and releases all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert. Must be non-empty.
    /// * `value` - The value to associate with the key.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The key was stored.
    /// * `Err(LanaiTreeError)` - The key was empty, too long, or already present.
    ///   The tree is left unchanged.
    pub fn insert<K>(&mut self, key: K, value: V) -> LanaiTreeResult<()>
    where
        K: AsRef<str>,
    {
        let key = key.as_ref();
        let chars = self.checked_chars(key)?;
        let id = self.descend_or_create(&chars);

        let node = &mut self.nodes[id.0];
        if node.is_final() {
            return Err(LanaiTreeError::DuplicateKey(key.to_string()));
        }
        node.data = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Inserts a key or replaces the value of an existing one.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(old))` - The key existed; `old` is its previous value.
    /// * `Ok(None)` - The key was new.
    /// * `Err(LanaiTreeError)` - The key was empty or too long.
    pub fn insert_or_replace<K>(&mut self, key: K, value: V) -> LanaiTreeResult<Option<V>>
    where
        K: AsRef<str>,
    {
        let chars = self.checked_chars(key.as_ref())?;
        let id = self.descend_or_create(&chars);

        let previous = self.nodes[id.0].data.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        Ok(previous)
    }

    /// Retrieves the value associated with a key.
    ///
    /// Empty keys are never stored, so they simply yield `None`.
    pub fn get<K>(&self, key: K) -> Option<&V>
    where
        K: AsRef<str>,
    {
        let id = self.find(key.as_ref())?;
        self.nodes[id.0].data.as_ref()
    }

    /// Retrieves the value associated with a key, rejecting empty keys.
    pub fn try_get<K>(&self, key: K) -> LanaiTreeResult<Option<&V>>
    where
        K: AsRef<str>,
    {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(LanaiTreeError::EmptyKey);
        }
        Ok(self.get(key))
    }

    /// Retrieves a mutable reference to the value associated with a key.
    pub fn get_mut<K>(&mut self, key: K) -> Option<&mut V>
    where
        K: AsRef<str>,
    {
        let id = self.find(key.as_ref())?;
        self.nodes[id.0].data.as_mut()
    }

    /// Checks if a key exists in the tree.
    pub fn contains_key<K>(&self, key: K) -> bool
    where
        K: AsRef<str>,
    {
        self.get(key).is_some()
    }

    /// Checks if a key exists in the tree, rejecting empty keys.
    pub fn try_contains_key<K>(&self, key: K) -> LanaiTreeResult<bool>
    where
        K: AsRef<str>,
    {
        Ok(self.try_get(key)?.is_some())
    }

    /// Removes a key from the tree and prunes the nodes it no longer needs.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The key was removed; `value` was stored under it.
    /// * `Ok(None)` - The key was not present. Nothing changed.
    /// * `Err(LanaiTreeError::EmptyKey)` - The key was empty.
    pub fn remove<K>(&mut self, key: K) -> LanaiTreeResult<Option<V>>
    where
        K: AsRef<str>,
    {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(LanaiTreeError::EmptyKey);
        }

        let id = match self.find(key) {
            Some(id) => id,
            None => return Ok(None),
        };

        let removed = self.nodes[id.0].data.take();
        if removed.is_some() {
            self.len -= 1;
            self.prune(id);
        }
        Ok(removed)
    }

    /// Returns the key at sorted position `index`.
    ///
    /// This walks the tree from the first key on every call, so it is O(n).
    /// Prefer [`LanaiTree::keys`] when visiting keys in sequence.
    ///
    /// # Errors
    ///
    /// [`LanaiTreeError::IndexOutOfRange`] when `index < 0` or `index >= len`.
    pub fn nth_key(&self, index: isize) -> LanaiTreeResult<String> {
        let out_of_range = LanaiTreeError::IndexOutOfRange {
            index,
            len: self.len,
        };
        let position = usize::try_from(index).map_err(|_| out_of_range.clone())?;
        if position >= self.len {
            return Err(out_of_range);
        }
        self.keys().nth(position).ok_or(out_of_range)
    }

    /// Lazily enumerates `(key, &value)` pairs in key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self, self.root, String::new())
    }

    /// Lazily enumerates keys in order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys::new(self.iter())
    }

    /// Lazily enumerates values in key order.
    pub fn values(&self) -> Values<'_, V> {
        Values::new(self.iter())
    }

    /// Lazily enumerates every entry whose key starts with `prefix`, in order.
    ///
    /// The prefix is followed like a lookup but need not be a key itself. An
    /// empty prefix enumerates the whole tree.
    pub fn subtree_by_prefix<P>(&self, prefix: P) -> Iter<'_, V>
    where
        P: AsRef<str>,
    {
        let prefix = prefix.as_ref();
        if prefix.is_empty() {
            return self.iter();
        }
        match self.find(prefix) {
            Some(id) => Iter::with_prefix_node(self, id, prefix.to_string()),
            None => Iter::empty(self),
        }
    }

    /// Returns every key that starts with the literal `prefix`.
    ///
    /// No pattern is compiled; this is a plain descent followed by an ordered
    /// enumeration of the subtree.
    pub fn match_prefix<P>(&self, prefix: P) -> BTreeSet<String>
    where
        P: AsRef<str>,
    {
        self.subtree_by_prefix(prefix).map(|(key, _)| key).collect()
    }

    /// Returns every key matching `pattern`, using the configured default mode.
    ///
    /// With the default [`MatchMode::Anchored`] the whole key must match. See
    /// [`pattern`] for the pattern language.
    ///
    /// # Errors
    ///
    /// Fails when the pattern is empty, too long, or malformed.
    pub fn match_pattern(&self, pattern: &str) -> LanaiTreeResult<BTreeSet<String>> {
        self.match_with_mode(pattern, self.config.default_mode)
    }

    /// Returns every key containing a match for `pattern` anywhere.
    ///
    /// The pattern is wrapped in implicit leading and trailing `.*` unless it
    /// already starts or ends with one.
    pub fn match_contains(&self, pattern: &str) -> LanaiTreeResult<BTreeSet<String>> {
        self.match_with_mode(pattern, MatchMode::Contains)
    }

    /// Returns every key matched by an already compiled pattern.
    pub fn match_compiled(&self, pattern: &Pattern) -> BTreeSet<String> {
        let matches = pattern::matcher::find_matches(self, pattern.table());
        debug!(
            pattern = pattern.source(),
            mode = ?pattern.mode(),
            matches = matches.len(),
            "Pattern matched"
        );
        matches
    }

    fn match_with_mode(&self, pattern: &str, mode: MatchMode) -> LanaiTreeResult<BTreeSet<String>> {
        let compiled = Pattern::with_limit(pattern, mode, self.config.max_pattern_length)?;
        Ok(self.match_compiled(&compiled))
    }

    /// The root node, if the tree holds any key.
    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Borrows a live node.
    pub(crate) fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }

    /// Validates a key and splits it into characters.
    fn checked_chars(&self, key: &str) -> LanaiTreeResult<Vec<char>> {
        if key.is_empty() {
            return Err(LanaiTreeError::EmptyKey);
        }
        let chars: Vec<char> = key.chars().collect();
        if chars.len() > self.config.max_key_length {
            return Err(LanaiTreeError::KeyTooLong {
                length: chars.len(),
                max_length: self.config.max_key_length,
            });
        }
        Ok(chars)
    }

    /// Follows `key` from the root, returning the node of its last character
    /// whether or not that node is final.
    fn find(&self, key: &str) -> Option<NodeId> {
        let mut chars = key.chars();
        let mut current = self.root?;
        let mut c = chars.next()?;

        loop {
            let node = &self.nodes[current.0];
            let link = match c.cmp(&node.value) {
                std::cmp::Ordering::Less => Link::Smaller,
                std::cmp::Ordering::Greater => Link::Bigger,
                std::cmp::Ordering::Equal => match chars.next() {
                    None => return Some(current),
                    Some(next) => {
                        c = next;
                        Link::Equal
                    }
                },
            };
            current = node.child(link)?;
        }
    }

    /// Follows `chars` from the root, creating the nodes that are missing, and
    /// returns the node of the last character. Never marks anything final.
    fn descend_or_create(&mut self, chars: &[char]) -> NodeId {
        let mut current = match self.root {
            Some(root) => root,
            None => {
                let root = self.alloc(chars[0], None);
                self.root = Some(root);
                root
            }
        };
        let mut pos = 0;

        loop {
            let c = chars[pos];
            let link = match c.cmp(&self.nodes[current.0].value) {
                std::cmp::Ordering::Less => Link::Smaller,
                std::cmp::Ordering::Greater => Link::Bigger,
                std::cmp::Ordering::Equal => {
                    if pos == chars.len() - 1 {
                        return current;
                    }
                    pos += 1;
                    Link::Equal
                }
            };

            current = match self.nodes[current.0].child(link) {
                Some(next) => next,
                None => {
                    let created = self.alloc(chars[pos], Some(current));
                    *self.nodes[current.0].child_mut(link) = Some(created);
                    created
                }
            };
        }
    }

    /// Detaches dead nodes upward from `id`, stopping at the first node that
    /// still has a child or terminates a key. A dead root is released too.
    fn prune(&mut self, id: NodeId) {
        let mut current = id;
        while self.nodes[current.0].is_dead() {
            match self.nodes[current.0].parent {
                Some(parent) => {
                    if let Some(link) = self.nodes[parent.0].link_to(current) {
                        *self.nodes[parent.0].child_mut(link) = None;
                    }
                    trace!(node = current.index(), value = %self.nodes[current.0].value, "Pruned node");
                    self.release(current);
                    current = parent;
                }
                None => {
                    if self.root == Some(current) {
                        self.root = None;
                    }
                    trace!(node = current.index(), "Pruned root");
                    self.release(current);
                    break;
                }
            }
        }
    }

    fn alloc(&mut self, value: char, parent: Option<NodeId>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Node::new(value, parent);
                id
            }
            None => {
                self.nodes.push(Node::new(value, parent));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.0];
        node.data = None;
        node.parent = None;
        node.smaller = None;
        node.equal = None;
        node.bigger = None;
        self.free.push(id);
    }
}

impl<V: Default> LanaiTree<V> {
    /// Inserts a key with the default value.
    pub fn insert_key<K>(&mut self, key: K) -> LanaiTreeResult<()>
    where
        K: AsRef<str>,
    {
        self.insert(key, V::default())
    }

    /// Builds a tree from keys, each stored with the default value.
    pub fn try_from_keys<I, K>(keys: I) -> LanaiTreeResult<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut tree = Self::new();
        for key in keys {
            tree.insert_key(key)?;
        }
        Ok(tree)
    }
}

impl<V: PartialEq> LanaiTree<V> {
    /// Checks whether any key maps to a value equal to `value`. O(n).
    pub fn contains_value(&self, value: &V) -> bool {
        self.values().any(|stored| stored == value)
    }
}

impl<V: Clone> LanaiTree<V> {
    /// Copies every entry out in key order.
    pub fn to_vec(&self) -> Vec<(String, V)> {
        self.iter().map(|(key, value)| (key, value.clone())).collect()
    }
}

impl<V> Default for LanaiTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for LanaiTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: PartialEq> PartialEq for LanaiTree<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for LanaiTree<V> {}

impl<K: AsRef<str>, V> Extend<(K, V)> for LanaiTree<V> {
    /// Inserts every pair, replacing values of keys already present.
    /// Empty and over-long keys are skipped.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            if let Err(e) = self.insert_or_replace(key.as_ref(), value) {
                tracing::warn!(key = key.as_ref(), error = %e, "Skipped key");
            }
        }
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for LanaiTree<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, V> IntoIterator for &'a LanaiTree<V> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
