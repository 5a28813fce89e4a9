//! Shared output utilities

pub mod pager;
