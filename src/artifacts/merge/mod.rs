//! Three-way merge
//!
//! - `resolution`: per-path outcome from the current, given and split
//!   snapshots, and the text written for conflicting paths

pub mod resolution;
