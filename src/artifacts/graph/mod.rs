//! Commit graph traversal
//!
//! - `commit_graph`: commit creation, parent lookup and merge base classification
//! - `split_point`: locating the baseline commit of a three-way merge

pub mod commit_graph;
pub mod split_point;
