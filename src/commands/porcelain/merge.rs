use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::{Migration, untracked_in_the_way};
use crate::artifacts::graph::commit_graph::MergeBase;
use crate::artifacts::merge::resolution::{self, MergeOutcome, Resolution};
use crate::artifacts::objects::commit::{Commit, Snapshot};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use std::io::Write;
use std::path::PathBuf;

const UP_TO_DATE_NOTICE: &str = "Given branch is an ancestor of the current branch.";
const FAST_FORWARD_NOTICE: &str = "Current branch fast-forwarded.";
const CONFLICT_NOTICE: &str = "Encountered a merge conflict.";

/// Both sides of a merge, loaded once the preconditions passed
struct MergeSides {
    current_branch: BranchName,
    given_branch: BranchName,
    current_oid: ObjectId,
    current: Commit,
    given_oid: ObjectId,
    given: Commit,
}

impl Repository {
    /// Merge `branch` into the current branch
    ///
    /// Preconditions are checked in order before anything is written: self
    /// merge, unknown branch, pending stages, then an untracked file the
    /// given side would overwrite.
    pub async fn merge(&mut self, branch: &str) -> anyhow::Result<MergeOutcome> {
        let current_branch = self.refs().current_branch()?;
        if current_branch.as_ref() == branch {
            return Err(TwigError::SelfMerge.into());
        }
        let given_branch = self.find_branch(branch, TwigError::BranchNotFound)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;
        if !index.is_empty() {
            return Err(TwigError::UncommittedChanges.into());
        }

        let (current_oid, current) = self.head_commit()?;
        let given_oid = self
            .refs()
            .read_branch(&given_branch)?
            .ok_or(TwigError::BranchNotFound)?;
        let given = self.database().load_commit(&given_oid)?;

        if let Some(path) =
            untracked_in_the_way(self.workspace(), current.snapshot(), given.snapshot())?
        {
            tracing::debug!(path = %path.display(), "untracked file blocks the merge");
            return Err(TwigError::UntrackedFileInTheWay.into());
        }

        let split = self.graph().find_split_point(&current_oid, &given_oid)?;
        let sides = MergeSides {
            current_branch,
            given_branch,
            current_oid,
            current,
            given_oid,
            given,
        };

        let split_oid = split.as_ref().map(|(oid, _)| oid);
        match MergeBase::classify(split_oid, &sides.current_oid, &sides.given_oid) {
            MergeBase::UpToDate => {
                writeln!(self.writer(), "{UP_TO_DATE_NOTICE}")?;
                Ok(MergeOutcome::UpToDate)
            }
            MergeBase::FastForward => self.fast_forward(&mut index, sides),
            MergeBase::Diverged(_) | MergeBase::Unrelated => {
                let split_snapshot = split
                    .map(|(_, commit)| commit.snapshot().clone())
                    .unwrap_or_default();
                self.merge_snapshots(&mut index, sides, &split_snapshot)
            }
        }
    }

    fn fast_forward(&self, index: &mut Index, sides: MergeSides) -> anyhow::Result<MergeOutcome> {
        let migration = Migration::plan(
            self.database(),
            self.workspace(),
            sides.current.snapshot(),
            sides.given.snapshot(),
        )?;
        self.workspace().apply_migration(&migration)?;

        self.refs()
            .update_branch(&sides.current_branch, &sides.given_oid)?;
        index.reset();
        index.write_updates()?;

        writeln!(self.writer(), "{FAST_FORWARD_NOTICE}")?;
        tracing::info!(
            branch = %sides.current_branch,
            commit = %sides.given_oid,
            "fast-forwarded"
        );

        Ok(MergeOutcome::FastForwarded(sides.given_oid))
    }

    fn merge_snapshots(
        &self,
        index: &mut Index,
        sides: MergeSides,
        split: &Snapshot,
    ) -> anyhow::Result<MergeOutcome> {
        let current = sides.current.snapshot();
        let given = sides.given.snapshot();
        let mut conflicts = Vec::<PathBuf>::new();

        for (path, outcome) in resolution::plan(current, given, split) {
            match outcome {
                Resolution::KeepCurrent => {}
                Resolution::TakeGiven(oid) => {
                    let blob = self.database().load_blob(&oid)?;
                    self.workspace().write_file(&path, blob.content())?;
                    index.stage_addition(path, oid);
                }
                Resolution::DeleteFile => {
                    if let Some(oid) = current.get(&path) {
                        self.workspace().delete_file(&path)?;
                        index.stage_removal(path, oid.clone());
                    }
                }
                Resolution::Conflict => {
                    let current_blob = current
                        .get(&path)
                        .map(|oid| self.database().load_blob(oid))
                        .transpose()?;
                    let given_blob = given
                        .get(&path)
                        .map(|oid| self.database().load_blob(oid))
                        .transpose()?;

                    let text =
                        resolution::conflict_text(current_blob.as_ref(), given_blob.as_ref());
                    self.workspace().write_file(&path, &text)?;
                    writeln!(self.writer(), "{CONFLICT_NOTICE}")?;
                    tracing::warn!(path = %path.display(), "merge conflict");
                    conflicts.push(path);
                }
            }
        }

        let message = format!("Merged {} into {}.", sides.given_branch, sides.current_branch);
        let snapshot = index.fold_onto(current);
        let (merge_oid, _) = self.graph().create_commit(
            &message,
            Some(sides.current_oid),
            Some(sides.given_oid),
            snapshot,
        )?;

        self.refs().update_branch(&sides.current_branch, &merge_oid)?;
        index.reset();
        index.write_updates()?;

        Ok(MergeOutcome::Merged {
            commit: merge_oid,
            conflicts,
        })
    }
}
