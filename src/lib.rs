//! Lanai Library
//!
//! An ordered string-keyed map built on a ternary search tree, with a pattern
//! matcher that prunes the tree walk instead of scanning every key. The
//! library backs the `lanai` command line tool and can be used on its own.
//!
//! # Modules
//!
//! - [`data_structures`]: the Lanai Tree and its pattern engine
//! - [`config`]: layered configuration (defaults, file, environment)
//! - [`error`]: application errors and error reporting

pub mod config;
pub mod data_structures;
pub mod error;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for Lanai.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
