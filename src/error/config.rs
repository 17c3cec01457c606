//! Configuration error module.
//!
//! Errors raised while loading, parsing and validating Lanai settings.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file is missing.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The configuration file or environment could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A setting holds a value that is not allowed.
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// A numeric setting is outside its valid range.
    #[error("Configuration value {key} is out of valid range: {message}")]
    ValueOutOfRange {
        /// Dotted path of the setting, e.g. `tree.max_key_length`
        key: String,
        /// Description of the valid range
        message: String,
    },
}
