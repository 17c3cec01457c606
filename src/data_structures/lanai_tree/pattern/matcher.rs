// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Evaluates a transition table against a tree.
//!
//! The walk pairs every reachable node with the pattern state active at its
//! key position. Pending pairs live on an explicit stack that shares one key
//! buffer, so neither long keys nor long sibling chains grow the call stack.

use std::collections::BTreeSet;

use super::table::{TransitionAction, TransitionTable};
use crate::data_structures::lanai_tree::cursor::Iter;
use crate::data_structures::lanai_tree::node::NodeId;
use crate::data_structures::lanai_tree::LanaiTree;

/// A node to test, with the pattern state active at its position.
///
/// `prefix_len` is the byte length of the key spelled before the node. The
/// stack is ordered by `prefix_len`, so writes past the popped frame's prefix
/// never disturb a frame still waiting below it.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    prefix_len: usize,
    state: usize,
}

/// Returns every key of `tree` accepted by `table`.
pub(crate) fn find_matches<V>(tree: &LanaiTree<V>, table: &TransitionTable) -> BTreeSet<String> {
    let mut matches = BTreeSet::new();
    let mut stack: Vec<Frame> = tree
        .root()
        .map(|node| Frame {
            node,
            prefix_len: 0,
            state: 0,
        })
        .into_iter()
        .collect();
    let mut key = String::new();
    let mut entered: Vec<usize> = Vec::new();

    while let Some(frame) = stack.pop() {
        let transitions = match table.state(frame.state) {
            Some(state) => state.transitions(),
            None => continue,
        };
        let node = tree.node(frame.node);

        // Siblings go below the descents pushed next
        for sibling in [node.smaller, node.bigger].into_iter().flatten() {
            stack.push(Frame {
                node: sibling,
                ..frame
            });
        }

        key.truncate(frame.prefix_len);
        key.push(node.value);

        // Repeat loops copy the next state's transitions, so targets recur
        entered.clear();
        for transition in transitions {
            if !transition.predicate.matches(node.value) || entered.contains(&transition.target) {
                continue;
            }
            entered.push(transition.target);

            if table.is_accepting(transition.target) {
                if node.is_final() {
                    matches.insert(key.clone());
                }
                continue;
            }

            match transition.action {
                TransitionAction::PrefixShortcut => {
                    let subtree = Iter::with_prefix_node(tree, frame.node, key.clone());
                    matches.extend(subtree.map(|(key, _)| key));
                    // Everything below this node is already collected
                    break;
                }
                TransitionAction::KeyCheck => {
                    if node.is_final() {
                        matches.insert(key.clone());
                    }
                }
                TransitionAction::Advance => {}
            }

            if let Some(equal) = node.equal {
                stack.push(Frame {
                    node: equal,
                    prefix_len: key.len(),
                    state: transition.target,
                });
            }
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::super::{MatchMode, Pattern};
    use super::*;
    use crate::data_structures::lanai_tree::DEFAULT_MAX_KEY_LENGTH;

    fn tree(keys: &[&str]) -> LanaiTree<()> {
        LanaiTree::try_from_keys(keys.iter().copied()).unwrap()
    }

    fn run(tree: &LanaiTree<()>, pattern: &str, mode: MatchMode) -> Vec<String> {
        let pattern = Pattern::with_mode(pattern, mode).unwrap();
        find_matches(tree, pattern.table()).into_iter().collect()
    }

    #[test]
    fn test_empty_tree_matches_nothing() {
        let empty = tree(&[]);
        assert!(run(&empty, ".*", MatchMode::Anchored).is_empty());
    }

    #[test]
    fn test_anchored_requires_full_key() {
        let keys = tree(&["one", "nose", "ore", "on"]);
        assert_eq!(run(&keys, "o.e", MatchMode::Anchored), vec!["one", "ore"]);
        assert_eq!(
            run(&keys, "o.e", MatchMode::Contains),
            vec!["nose", "one", "ore"]
        );
    }

    #[test]
    fn test_key_check_on_intermediate_node() {
        let keys = tree(&["a", "ab", "abb", "abc", "b"]);
        assert_eq!(run(&keys, "ab*", MatchMode::Anchored), vec!["a", "ab", "abb"]);
    }

    #[test]
    fn test_prefix_shortcut_collects_subtree() {
        let keys = tree(&["th", "the", "there", "three", "tea", "ath"]);
        assert_eq!(
            run(&keys, "th.*", MatchMode::Anchored),
            vec!["th", "the", "there", "three"]
        );
    }

    #[test]
    fn test_loop_with_overlapping_exit() {
        // 'a' both loops in `.*` and exits to the final 'a'
        let keys = tree(&["aa", "aba", "abab", "a", "ba"]);
        assert_eq!(run(&keys, "a.*a", MatchMode::Anchored), vec!["aa", "aba"]);
    }

    #[test]
    fn test_key_of_maximum_length() {
        let mut keys = LanaiTree::new();
        let long = "ab".repeat(DEFAULT_MAX_KEY_LENGTH / 2);
        keys.insert_key(&long).unwrap();
        keys.insert_key(&long[..long.len() - 1]).unwrap();
        keys.insert_key("abc").unwrap();

        let all = run(&keys, "[ab]*", MatchMode::Anchored);
        assert_eq!(all.len(), 2);
        assert!(all.contains(&long));

        assert_eq!(run(&keys, "ba", MatchMode::Contains).len(), 2);
        assert_eq!(run(&keys, "b", MatchMode::Contains).len(), 3);
        assert_eq!(run(&keys, ".*c", MatchMode::Anchored), vec!["abc"]);
    }

    #[test]
    fn test_shared_buffer_keeps_sibling_prefixes() {
        let keys = tree(&["cat", "car", "cart", "cab", "dog", "do", "a"]);
        assert_eq!(
            run(&keys, ".a.*", MatchMode::Anchored),
            vec!["cab", "car", "cart", "cat"]
        );
        assert_eq!(run(&keys, "[cd]o*.*", MatchMode::Anchored).len(), 6);
    }

    #[test]
    fn test_deep_sibling_chain() {
        let mut keys = LanaiTree::new();
        for code in 0x100u32..0x100 + 5_000 {
            if let Some(c) = char::from_u32(code) {
                keys.insert(format!("{c}x"), ()).unwrap();
            }
        }
        assert_eq!(run(&keys, ".x", MatchMode::Anchored).len(), keys.len());
    }
}
