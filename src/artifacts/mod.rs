//! twig data structures and algorithms
//!
//! - `branch`: Branch name validation and ref targets
//! - `checkout`: Snapshot switch planning and untracked-file detection
//! - `core`: Shared output utilities (pager wrapper)
//! - `diff`: LCS line diffing and file patches
//! - `graph`: Commit graph traversal and split points
//! - `index`: Staging index file format
//! - `merge`: Three-way merge resolution and conflict text
//! - `objects`: Object types (blob, commit)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod diff;
pub mod graph;
pub mod index;
pub mod merge;
pub mod objects;
pub mod status;
