//! JSON serialization for variables files.
//!
//! Output files are written with:
//! - 2-space indentation
//! - Trailing newline
//! - Keys in insertion order (via `IndexMap`)

mod json;

pub use json::*;
