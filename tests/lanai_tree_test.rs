// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Integration tests for the Lanai Tree through the public API.

use std::collections::BTreeSet;

use lanai_lib::data_structures::lanai_tree::pattern::TransitionAction;
use lanai_lib::data_structures::lanai_tree::{
    LanaiTree, LanaiTreeConfig, LanaiTreeError, MatchMode, Pattern,
};

fn numbers() -> LanaiTree<i32> {
    LanaiTree::try_from_pairs([("zero", 0), ("one", 1), ("two", 2), ("three", 3), ("four", 4)])
        .unwrap()
}

fn set(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[test]
fn test_ordered_keys_and_position() {
    let tree = numbers();
    let keys: Vec<String> = tree.keys().collect();
    assert_eq!(keys, vec!["four", "one", "three", "two", "zero"]);
    assert_eq!(tree.nth_key(0).unwrap(), "four");
    assert_eq!(tree.nth_key(4).unwrap(), "zero");
    assert!(matches!(
        tree.nth_key(5),
        Err(LanaiTreeError::IndexOutOfRange { index: 5, len: 5 })
    ));
}

#[test]
fn test_prefix_and_contains_patterns() {
    let tree = numbers();
    assert_eq!(tree.match_pattern("t.*").unwrap(), set(&["three", "two"]));
    assert_eq!(
        tree.match_pattern(".*o.*").unwrap(),
        set(&["four", "one", "two", "zero"])
    );
    assert_eq!(tree.match_prefix("t"), set(&["three", "two"]));
}

#[test]
fn test_dot_star_between_literals() {
    let tree: LanaiTree<()> = LanaiTree::try_from_keys([
        "aa",
        "aba",
        "abca",
        "abbbcbcbccccbba",
        "a",
        "ab",
        "ba",
        "abc",
    ])
    .unwrap();
    assert_eq!(
        tree.match_pattern("a.*a").unwrap(),
        set(&["aa", "aba", "abca", "abbbcbcbccccbba"])
    );
}

#[test]
fn test_negated_range() {
    let tree: LanaiTree<()> =
        LanaiTree::try_from_keys(["a", "b", "c", "d", "e", "0", "1", "2", "3", "4"]).unwrap();
    assert_eq!(
        tree.match_pattern("[^0-9]").unwrap(),
        set(&["a", "b", "c", "d", "e"])
    );
}

#[test]
fn test_malformed_patterns() {
    let tree = numbers();
    for pattern in ["*bad", "[unterminated", "\\xZZ"] {
        assert!(
            matches!(
                tree.match_pattern(pattern),
                Err(LanaiTreeError::PatternSyntax { .. })
            ),
            "{pattern:?} should be rejected"
        );
    }
}

#[test]
fn test_map_operations() {
    let mut tree = numbers();

    assert_eq!(tree.get("three"), Some(&3));
    if let Some(value) = tree.get_mut("three") {
        *value = 33;
    }
    assert_eq!(tree.insert_or_replace("three", 3).unwrap(), Some(33));
    assert!(tree.contains_value(&3));

    assert_eq!(tree.remove("three").unwrap(), Some(3));
    assert_eq!(tree.remove("three").unwrap(), None);
    assert!(tree.contains_key("two"));
    assert_eq!(tree.match_pattern("t.*").unwrap(), set(&["two"]));

    assert_eq!(tree.try_get(""), Err(LanaiTreeError::EmptyKey));
    assert_eq!(
        tree.to_vec(),
        vec![
            ("four".to_string(), 4),
            ("one".to_string(), 1),
            ("two".to_string(), 2),
            ("zero".to_string(), 0)
        ]
    );

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 0);
}

#[test]
fn test_configured_tree() {
    let config = LanaiTreeConfig::new()
        .with_max_key_length(8)
        .with_default_mode(MatchMode::Contains);
    let mut tree: LanaiTree<()> = LanaiTree::with_config(config);

    tree.extend([("document", ()), ("documents", ()), ("doc", ())]);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.match_pattern("cum").unwrap(), set(&["document"]));
}

#[test]
fn test_pattern_inspection() {
    let pattern = Pattern::compile("th.*").unwrap();
    let table = pattern.table();
    assert_eq!(table.len(), 3);

    let last = &table.states()[2].transitions()[0];
    assert!(last.predicate.matches('x'));
    assert_eq!(last.action, TransitionAction::PrefixShortcut);
}

#[test]
fn test_collect_and_iterate() {
    let tree: LanaiTree<usize> = ["b", "a", "c"]
        .into_iter()
        .enumerate()
        .map(|(i, key)| (key.to_string(), i))
        .collect();

    let entries: Vec<(String, &usize)> = (&tree).into_iter().collect();
    assert_eq!(
        entries,
        vec![
            ("a".to_string(), &1),
            ("b".to_string(), &0),
            ("c".to_string(), &2)
        ]
    );
    assert_eq!(format!("{tree:?}"), r#"{"a": 1, "b": 0, "c": 2}"#);
}
