use crate::areas::database::Database;
use crate::artifacts::graph::split_point::SplitPointFinder;
use crate::artifacts::objects::commit::{Commit, Snapshot, repository_epoch};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::config::{CommitClock, RepositoryConfig};
use crate::errors::TwigError;
use chrono::{DateTime, FixedOffset, SubsecRound};

/// Message of the commit created by `init`
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// How two branch tips relate, as seen through their split point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeBase {
    /// The given tip is the split point: nothing to merge
    UpToDate,
    /// The current tip is the split point: move it forward
    FastForward,
    /// Both sides moved away from the split point
    Diverged(ObjectId),
    /// No split point was found; merge against an empty snapshot
    Unrelated,
}

impl MergeBase {
    pub fn classify(split: Option<&ObjectId>, current_tip: &ObjectId, given_tip: &ObjectId) -> Self {
        match split {
            None => MergeBase::Unrelated,
            Some(split) if split == given_tip => MergeBase::UpToDate,
            Some(split) if split == current_tip => MergeBase::FastForward,
            Some(split) => MergeBase::Diverged(split.clone()),
        }
    }
}

/// Commit creation and traversal on top of the object store
#[derive(Debug)]
pub struct CommitGraph<'r> {
    database: &'r Database,
    config: RepositoryConfig,
}

impl<'r> CommitGraph<'r> {
    pub fn new(database: &'r Database, config: RepositoryConfig) -> Self {
        CommitGraph { database, config }
    }

    /// Store a new commit
    ///
    /// Parents must already be stored. The root commit always gets the
    /// repository epoch; other commits follow the configured clock.
    pub fn create_commit(
        &self,
        message: &str,
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        snapshot: Snapshot,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        if message.is_empty() {
            return Err(TwigError::MissingCommitMessage.into());
        }
        for linked in parent.iter().chain(merge_parent.iter()) {
            if !self.database.contains_commit(linked) {
                return Err(TwigError::ObjectNotFound(linked.clone()).into());
            }
        }

        let timestamp = self.timestamp_for(parent.is_none())?;
        let commit = Commit::new(parent, merge_parent, timestamp, snapshot, message.to_string());
        let oid = self.database.store(&commit)?;
        tracing::info!(%oid, merge = commit.is_merge(), "created commit");

        Ok((oid, commit))
    }

    pub fn create_root_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        self.create_commit(ROOT_COMMIT_MESSAGE, None, None, Snapshot::new())
    }

    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        self.database.load_commit(oid)
    }

    pub fn parent_of(&self, commit: &Commit) -> anyhow::Result<Commit> {
        match commit.parent() {
            Some(parent) => self.load(parent),
            None => Err(TwigError::NoParent(commit.object_id()?).into()),
        }
    }

    /// `tip` followed by its first parents down to the root
    pub fn first_parent_history(&self, tip: &ObjectId) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut history = Vec::new();
        let mut next = Some(tip.clone());

        while let Some(oid) = next {
            let commit = self.load(&oid)?;
            next = commit.parent().cloned();
            history.push((oid, commit));
        }

        Ok(history)
    }

    pub fn find_split_point(
        &self,
        a: &ObjectId,
        b: &ObjectId,
    ) -> anyhow::Result<Option<(ObjectId, Commit)>> {
        let finder = SplitPointFinder::new(
            |oid| self.database.load_commit(oid)?.to_slim(),
            self.config.split_point,
        );

        finder
            .find(a, b)?
            .map(|oid| self.load(&oid).map(|commit| (oid, commit)))
            .transpose()
    }

    fn timestamp_for(&self, is_root: bool) -> anyhow::Result<DateTime<FixedOffset>> {
        match (is_root, self.config.commit_clock) {
            (false, CommitClock::Now) => Ok(chrono::Local::now().fixed_offset().trunc_subsecs(0)),
            _ => repository_epoch(),
        }
    }
}
