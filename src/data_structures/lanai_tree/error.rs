// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the Lanai Tree.
//!
//! Absent keys are not errors: lookups and removals report them through
//! `Option`/`bool`. The variants below are caller mistakes.

/// Errors that can occur in Lanai Tree operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum LanaiTreeError {
    /// Error when an empty key is provided.
    #[error("Empty key not allowed")]
    EmptyKey,

    /// Error when an empty pattern is provided.
    #[error("Empty pattern not allowed")]
    EmptyPattern,

    /// Error when a key exceeds the configured maximum length.
    #[error("Key of {length} characters exceeds maximum key length of {max_length}")]
    KeyTooLong {
        /// Length of the rejected key in characters.
        length: usize,
        /// The maximum allowed length.
        max_length: usize,
    },

    /// Error when inserting a key that is already stored.
    #[error("Duplicate key: '{0}'")]
    DuplicateKey(String),

    /// Error when positional access falls outside `[0, len)`.
    #[error("Index {index} is out of range for tree of {len} keys")]
    IndexOutOfRange {
        /// The requested index.
        index: isize,
        /// Number of keys in the tree.
        len: usize,
    },

    /// Error when a pattern is malformed.
    #[error("Invalid pattern at position {position}: {message}")]
    PatternSyntax {
        /// Character position of the fault in the pattern.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// Error when a pattern exceeds the configured maximum length.
    #[error("Pattern of {length} characters exceeds maximum pattern length of {max_length}")]
    PatternTooLong {
        /// Length of the rejected pattern in characters.
        length: usize,
        /// The maximum allowed length.
        max_length: usize,
    },
}

impl LanaiTreeError {
    /// Shorthand for building a [`LanaiTreeError::PatternSyntax`].
    pub(crate) fn syntax<S: Into<String>>(position: usize, message: S) -> Self {
        Self::PatternSyntax {
            position,
            message: message.into(),
        }
    }

    /// Returns the fault position if this is a pattern syntax error.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::PatternSyntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result type for Lanai Tree operations
pub type LanaiTreeResult<T> = std::result::Result<T, LanaiTreeError>;
