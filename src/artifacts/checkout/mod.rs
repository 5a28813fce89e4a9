//! Moving the working directory from one snapshot to another
//!
//! Used by branch checkout, reset and fast-forward merges. The whole plan is
//! computed, and checked for untracked files in the way, before any file is
//! touched.

pub mod migration;
