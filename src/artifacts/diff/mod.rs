//! Line-level diffing
//!
//! - `diff_algorithm`: LCS alignment of two line sequences grouped in hunks
//! - `diff_target`: the two sides of a file comparison and patch rendering
//!
//! Both sides are materialized in memory as decoded text lines.

pub mod diff_algorithm;
pub mod diff_target;
