// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Tree-guided pattern matching.
//!
//! Patterns are compiled into a [`TransitionTable`] and evaluated by walking
//! the tree, so only branches whose characters can still satisfy the pattern
//! are visited.
//!
//! # Pattern Language
//!
//! | Syntax            | Matches                                            |
//! |-------------------|----------------------------------------------------|
//! | `c`               | the literal character `c`                          |
//! | `.`               | any single character                               |
//! | `x*`              | zero or more of the preceding item                 |
//! | `[abc]`, `[^abc]` | one character in (or not in) the set               |
//! | `[a-z]`, `[^a-z]` | one character in (or outside) the inclusive range  |
//! | `\d \D \w \W \s \S` | Unicode digit, word and whitespace classes       |
//! | `\p{Name}`, `\P{Name}` | Unicode general category or script          |
//! | `\t \n \r \v \f \a \b \e` | control characters                       |
//! | `\0nn`, `\xHH`, `\uHHHH` | character by octal or hex code            |
//! | `\cX`             | control character for `X`                          |
//! | `\` + other      | the character itself, e.g. `\.` or `\*`             |
//!
//! `*` may follow any single item, including a class or an escape. Grouping,
//! alternation and anchors are not part of the language.
//!
//! In [`MatchMode::Anchored`] the whole key must match. [`MatchMode::Contains`]
//! behaves as if the pattern were wrapped in `.*` on both sides.

mod compiler;
pub(crate) mod matcher;
pub mod predicate;
pub mod table;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use predicate::{CharCategory, CharPredicate};
pub use table::{State, Transition, TransitionAction, TransitionTable};

use super::error::{LanaiTreeError, LanaiTreeResult};
use super::DEFAULT_MAX_PATTERN_LENGTH;

/// How much of a key a pattern has to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The pattern must match the entire key.
    #[default]
    Anchored,

    /// The pattern may match anywhere inside the key.
    Contains,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anchored => write!(f, "anchored"),
            Self::Contains => write!(f, "contains"),
        }
    }
}

/// A compiled pattern, reusable across trees and queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    mode: MatchMode,
    table: TransitionTable,
    regex: String,
}

impl Pattern {
    /// Compiles an anchored pattern.
    ///
    /// # Arguments
    ///
    /// * `pattern` - The pattern source
    ///
    /// # Returns
    ///
    /// The compiled pattern, or the first syntax error with its position.
    pub fn compile(pattern: &str) -> LanaiTreeResult<Self> {
        Self::with_mode(pattern, MatchMode::Anchored)
    }

    /// Compiles a pattern that may match anywhere inside a key.
    pub fn contains(pattern: &str) -> LanaiTreeResult<Self> {
        Self::with_mode(pattern, MatchMode::Contains)
    }

    /// Compiles a pattern in the given mode.
    pub fn with_mode(pattern: &str, mode: MatchMode) -> LanaiTreeResult<Self> {
        Self::with_limit(pattern, mode, DEFAULT_MAX_PATTERN_LENGTH)
    }

    /// Compiles a pattern in the given mode, rejecting sources longer than
    /// `max_length` characters.
    pub fn with_limit(
        pattern: &str,
        mode: MatchMode,
        max_length: usize,
    ) -> LanaiTreeResult<Self> {
        let length = pattern.chars().count();
        if length > max_length {
            return Err(LanaiTreeError::PatternTooLong { length, max_length });
        }

        Ok(Self {
            source: pattern.to_string(),
            mode,
            table: compiler::compile(pattern, mode)?,
            regex: compiler::to_regex(pattern, mode)?,
        })
    }

    /// The pattern as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The mode the pattern was compiled in.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The compiled transition table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// An anchored `regex` crate pattern accepting the same keys.
    ///
    /// Classes and wildcards are translated rather than copied, since the
    /// two syntaxes disagree on `.` and on escapes inside `[...]`.
    pub fn to_regex(&self) -> &str {
        &self.regex
    }
}

impl FromStr for Pattern {
    type Err = LanaiTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_modes() {
        let anchored = Pattern::compile("o.e").unwrap();
        assert_eq!(anchored.mode(), MatchMode::Anchored);
        assert_eq!(anchored.source(), "o.e");
        assert_eq!(anchored.table().len(), 3);

        let contains = Pattern::contains("o.e").unwrap();
        assert_eq!(contains.mode(), MatchMode::Contains);
        assert_eq!(contains.table().len(), 5);
    }

    #[test]
    fn test_regex_equivalent_agrees_on_newline_and_class_escapes() {
        let keys = ["a\nb", "adb", "a7b", "axb"];

        let wildcard = Pattern::compile("a.b").unwrap();
        let regex = regex::Regex::new(wildcard.to_regex()).unwrap();
        assert!(keys.iter().all(|key| regex.is_match(key)));

        // Inside a class `\d` is the letter d
        let class = Pattern::compile(r"a[\d]b").unwrap();
        let regex = regex::Regex::new(class.to_regex()).unwrap();
        let matched: Vec<_> = keys.iter().filter(|key| regex.is_match(key)).collect();
        assert_eq!(matched, vec![&"adb"]);

        let contains = Pattern::contains("d").unwrap();
        let regex = regex::Regex::new(contains.to_regex()).unwrap();
        assert!(regex.is_match("adb"));
        assert!(!regex.is_match("axb"));
    }

    #[test]
    fn test_from_str() {
        let pattern: Pattern = "[a-c]x*".parse().unwrap();
        assert_eq!(pattern.to_string(), "[a-c]x*");
        assert!("*".parse::<Pattern>().is_err());
    }

    #[test]
    fn test_pattern_length_limit() {
        let err = Pattern::with_limit("abcdef", MatchMode::Anchored, 5).unwrap_err();
        assert_eq!(
            err,
            LanaiTreeError::PatternTooLong {
                length: 6,
                max_length: 5
            }
        );
        assert!(Pattern::with_limit("abcde", MatchMode::Anchored, 5).is_ok());
    }

    #[test]
    fn test_match_mode_serde() {
        assert_eq!(serde_json::to_string(&MatchMode::Contains).unwrap(), "\"contains\"");
        let mode: MatchMode = serde_json::from_str("\"anchored\"").unwrap();
        assert_eq!(mode, MatchMode::Anchored);
        assert_eq!(MatchMode::default(), MatchMode::Anchored);
    }
}
