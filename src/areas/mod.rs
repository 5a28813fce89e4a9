//! Core repository components
//!
//! - `database`: Object store for blobs and commits
//! - `index`: Staging index of pending additions and removals
//! - `refs`: Branch pointers and HEAD
//! - `repository`: The repository context the commands run against
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
