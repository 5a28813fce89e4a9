//! twig: a small content-addressed version-control system
//!
//! - `areas`: on-disk components of a repository and the repository context
//! - `artifacts`: object types, file formats and algorithms
//! - `commands`: one `impl Repository` block per command
//! - `config`, `errors`, `telemetry`: ambient concerns shared by all of them

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
pub mod telemetry;
