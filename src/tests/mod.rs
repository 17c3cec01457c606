//! Test modules for Lanai.
//!
//! Unit tests live next to the code they cover; the modules here exercise
//! behavior that spans components:
//! - configuration loading and layering
//! - error types and reporting
//! - tree invariants, checked with proptest
//! - pattern semantics, table driven and cross-checked against `regex`

pub mod config_tests;
