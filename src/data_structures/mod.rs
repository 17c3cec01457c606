//! Data structures for Lanai.
//!
//! All implementations follow the project rules:
//! - No unsafe code
//! - Fallible operations return explicit error types
//! - No native recursion proportional to the number of stored keys

pub mod lanai_tree;

pub use lanai_tree::{LanaiTree, LanaiTreeConfig, LanaiTreeError, LanaiTreeResult, MatchMode, Pattern};
