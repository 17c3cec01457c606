// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Single-character predicates used by compiled transitions.

use std::fmt;

use regex::Regex;

/// A named character class such as `\d`, `\w` or `\p{Lu}`.
///
/// Membership is answered by the `regex` crate's Unicode tables rather than
/// reimplemented here.
#[derive(Clone)]
pub struct CharCategory {
    /// The class as written in the pattern, e.g. `\p{L}`
    class: String,

    /// Anchored single-character matcher for the class
    matcher: Regex,
}

impl CharCategory {
    /// Builds a category from its escape syntax (`\d`, `\S`, `\p{Greek}`, ...).
    ///
    /// # Errors
    ///
    /// Returns the `regex` error when the class is unknown.
    pub fn new(class: &str) -> Result<Self, regex::Error> {
        let matcher = Regex::new(&format!("^{class}$"))?;
        Ok(Self {
            class: class.to_string(),
            matcher,
        })
    }

    /// The class as written in the pattern.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Whether `c` belongs to the class.
    pub fn contains(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.matcher.is_match(c.encode_utf8(&mut buf))
    }
}

impl PartialEq for CharCategory {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
    }
}

impl Eq for CharCategory {}

impl fmt::Debug for CharCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CharCategory").field(&self.class).finish()
    }
}

/// A test applied to the character of a single tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharPredicate {
    /// Exactly this character
    Exact(char),

    /// Any character (`.`)
    Any,

    /// Inclusive range, `lo <= hi`
    Range(char, char),

    /// Anything outside the inclusive range
    NotRange(char, char),

    /// Member of the set (sorted, deduplicated)
    AnyOf(Vec<char>),

    /// Not a member of the set (sorted, deduplicated)
    NoneOf(Vec<char>),

    /// Member of a named character class
    Category(CharCategory),
}

impl CharPredicate {
    /// Builds a range predicate, ordering the bounds.
    pub fn range(a: char, b: char) -> Self {
        Self::Range(a.min(b), a.max(b))
    }

    /// Builds a negated range predicate, ordering the bounds.
    pub fn not_range(a: char, b: char) -> Self {
        Self::NotRange(a.min(b), a.max(b))
    }

    /// Builds a set predicate.
    pub fn any_of<I: IntoIterator<Item = char>>(chars: I) -> Self {
        Self::AnyOf(normalize(chars))
    }

    /// Builds a negated set predicate.
    pub fn none_of<I: IntoIterator<Item = char>>(chars: I) -> Self {
        Self::NoneOf(normalize(chars))
    }

    /// Evaluates the predicate against one character.
    pub fn matches(&self, c: char) -> bool {
        match self {
            Self::Exact(expected) => c == *expected,
            Self::Any => true,
            Self::Range(lo, hi) => (*lo..=*hi).contains(&c),
            Self::NotRange(lo, hi) => !(*lo..=*hi).contains(&c),
            Self::AnyOf(set) => set.binary_search(&c).is_ok(),
            Self::NoneOf(set) => set.binary_search(&c).is_err(),
            Self::Category(category) => category.contains(c),
        }
    }

    /// The predicate in `regex` crate syntax, matching one character.
    pub fn to_regex(&self) -> String {
        match self {
            Self::Exact(c) => escape(*c),
            Self::Any => "(?s:.)".to_string(),
            Self::Range(lo, hi) => format!("[{}-{}]", escape(*lo), escape(*hi)),
            Self::NotRange(lo, hi) => format!("[^{}-{}]", escape(*lo), escape(*hi)),
            Self::AnyOf(set) => format!("[{}]", set.iter().map(|c| escape(*c)).collect::<String>()),
            Self::NoneOf(set) => {
                format!("[^{}]", set.iter().map(|c| escape(*c)).collect::<String>())
            }
            Self::Category(category) => category.class().to_string(),
        }
    }

    /// Whether this is the unconstrained wildcard `.`.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

fn escape(c: char) -> String {
    let mut buf = [0u8; 4];
    regex::escape(c.encode_utf8(&mut buf))
}

fn normalize<I: IntoIterator<Item = char>>(chars: I) -> Vec<char> {
    let mut set: Vec<char> = chars.into_iter().collect();
    set.sort_unstable();
    set.dedup();
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_predicates() {
        assert!(CharPredicate::Exact('a').matches('a'));
        assert!(!CharPredicate::Exact('a').matches('A'));
        assert!(CharPredicate::Any.matches('\u{1F600}'));
    }

    #[test]
    fn test_ranges_normalize_bounds() {
        let range = CharPredicate::range('z', 'a');
        assert_eq!(range, CharPredicate::Range('a', 'z'));
        assert!(range.matches('m'));
        assert!(!range.matches('A'));

        let outside = CharPredicate::not_range('0', '9');
        assert!(outside.matches('a'));
        assert!(!outside.matches('5'));
    }

    #[test]
    fn test_sets() {
        let set = CharPredicate::any_of("cbac".chars());
        assert_eq!(set, CharPredicate::AnyOf(vec!['a', 'b', 'c']));
        assert!(set.matches('b'));
        assert!(!set.matches('d'));

        let not_set = CharPredicate::none_of(['A', 'a']);
        assert!(not_set.matches('b'));
        assert!(!not_set.matches('A'));
    }

    #[test]
    fn test_categories() {
        let digit = CharCategory::new(r"\d").unwrap();
        assert!(digit.contains('7'));
        assert!(digit.contains('٣'));
        assert!(!digit.contains('x'));

        let upper = CharCategory::new(r"\p{Lu}").unwrap();
        assert!(upper.contains('Q'));
        assert!(!upper.contains('q'));

        let not_space = CharPredicate::Category(CharCategory::new(r"\S").unwrap());
        assert!(not_space.matches('x'));
        assert!(!not_space.matches(' '));

        assert!(CharCategory::new(r"\p{NotAClass}").is_err());
    }

    #[test]
    fn test_to_regex_agrees_with_matches() {
        let predicates = [
            CharPredicate::Exact('*'),
            CharPredicate::Any,
            CharPredicate::range('-', ']'),
            CharPredicate::not_range('a', 'z'),
            CharPredicate::any_of(['^', '-', '\\', 'x']),
            CharPredicate::none_of(['[', '&']),
            CharPredicate::Category(CharCategory::new(r"\w").unwrap()),
        ];
        let samples = ['*', 'a', 'x', '^', '-', '\\', '[', '&', '\n', 'Z', '_', '9', ' '];
        for predicate in &predicates {
            let regex = Regex::new(&format!("^{}$", predicate.to_regex())).unwrap();
            for c in samples {
                assert_eq!(
                    regex.is_match(&c.to_string()),
                    predicate.matches(c),
                    "{predicate:?} on {c:?}"
                );
            }
        }
    }

    #[test]
    fn test_category_equality_uses_class() {
        assert_eq!(
            CharCategory::new(r"\w").unwrap(),
            CharCategory::new(r"\w").unwrap()
        );
        assert_ne!(
            CharCategory::new(r"\w").unwrap(),
            CharCategory::new(r"\W").unwrap()
        );
    }
}
