//! Runtime configuration
//!
//! Like the author settings of a commit, configuration is read from the
//! environment once per process:
//!
//! - `TWIG_SPLIT_POINT`: `first-parent` (default) or `ancestors`
//! - `TWIG_COMMIT_CLOCK`: `epoch` (default) or `now`
//! - `NO_PAGER`: any value disables the log pager

use anyhow::Context;
use std::str::FromStr;

pub const SPLIT_POINT_VAR: &str = "TWIG_SPLIT_POINT";
pub const COMMIT_CLOCK_VAR: &str = "TWIG_COMMIT_CLOCK";
pub const NO_PAGER_VAR: &str = "NO_PAGER";

/// How the merge base of two branch tips is located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPointStrategy {
    /// Lockstep first-parent chains compared by parent id
    #[default]
    FirstParent,
    /// Nearest common ancestor over all parents
    Ancestors,
}

impl FromStr for SplitPointStrategy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "first-parent" => Ok(SplitPointStrategy::FirstParent),
            "ancestors" => Ok(SplitPointStrategy::Ancestors),
            other => anyhow::bail!("unknown split point strategy '{other}'"),
        }
    }
}

/// Which timestamp non-root commits receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitClock {
    /// Every commit is stamped with the repository epoch
    #[default]
    Epoch,
    /// Non-root commits are stamped with the current local time
    Now,
}

impl FromStr for CommitClock {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "epoch" => Ok(CommitClock::Epoch),
            "now" => Ok(CommitClock::Now),
            other => anyhow::bail!("unknown commit clock '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepositoryConfig {
    pub split_point: SplitPointStrategy,
    pub commit_clock: CommitClock,
    pub pager: bool,
}

impl RepositoryConfig {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let split_point = read_var(SPLIT_POINT_VAR)?.unwrap_or_default();
        let commit_clock = read_var(COMMIT_CLOCK_VAR)?.unwrap_or_default();
        let pager = std::env::var_os(NO_PAGER_VAR).is_none();

        Ok(RepositoryConfig {
            split_point,
            commit_clock,
            pager,
        })
    }
}

fn read_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr<Err = anyhow::Error>,
{
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {name}")),
        _ => Ok(None),
    }
}
