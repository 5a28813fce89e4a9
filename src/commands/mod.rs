//! twig command implementations
//!
//! Every command is an `impl Repository` block under `porcelain`. Commands
//! write their output through the repository writer and report user-facing
//! failures as [`crate::errors::TwigError`].

pub mod porcelain;
