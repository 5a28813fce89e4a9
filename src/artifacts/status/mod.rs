//! Working tree status inspection
//!
//! Compares the working directory against the current commit and the
//! staging index.
//!
//! - `file_change`: kinds of unstaged working-tree changes
//! - `status_info`: the status sections computed for one repository state

pub mod file_change;
pub mod status_info;
