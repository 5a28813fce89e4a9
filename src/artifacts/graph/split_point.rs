//! Split point search
//!
//! The split point of two branch tips is the commit used as the common
//! baseline of a three-way merge. Two strategies are available:
//!
//! ## First parent (default)
//!
//! Both tips are walked along their first parents in lockstep, collecting
//! entries while *both* sides still have a parent. The chains are then
//! scanned from their oldest entry backwards and the first chain-A entry
//! whose parent id matches the parent id of some chain-B entry is returned.
//! Ids match when equal or when one is a prefix of the other.
//!
//! This strategy compares parents rather than the commits themselves and
//! never looks at merge parents, so it finds nothing when one tip is the
//! direct child of the other's root, and can pick an older commit than the
//! nearest common ancestor on non-linear histories.
//!
//! ## Ancestors
//!
//! The full ancestor set of B (over both parents) is collected breadth
//! first, then A's ancestry is walked breadth first and the first commit in
//! that set is returned.
//!
//! ```rust,ignore
//! let finder = SplitPointFinder::new(
//!     |oid| database.load_commit(oid)?.to_slim(),
//!     SplitPointStrategy::Ancestors,
//! );
//! let split = finder.find(&current_tip, &given_tip)?;
//! ```

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::config::SplitPointStrategy;
use std::collections::{HashSet, VecDeque};

pub struct SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
    strategy: SplitPointStrategy,
}

impl<CommitLoaderFn> SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn, strategy: SplitPointStrategy) -> Self {
        SplitPointFinder {
            commit_loader,
            strategy,
        }
    }

    pub fn find(&self, a: &ObjectId, b: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let split = match self.strategy {
            SplitPointStrategy::FirstParent => self.first_parent(a, b)?,
            SplitPointStrategy::Ancestors => self.nearest_common_ancestor(a, b)?,
        };
        tracing::debug!(
            strategy = ?self.strategy,
            %a,
            %b,
            split = ?split.as_ref().map(ObjectId::to_short_oid),
            "searched split point"
        );

        Ok(split)
    }

    fn first_parent(&self, a: &ObjectId, b: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let mut chain_a = Vec::new();
        let mut chain_b = Vec::new();

        let mut commit_a = (self.commit_loader)(a)?;
        let mut commit_b = (self.commit_loader)(b)?;
        while let (Some(parent_a), Some(parent_b)) =
            (commit_a.parent.clone(), commit_b.parent.clone())
        {
            chain_a.push(commit_a);
            chain_b.push(commit_b);
            commit_a = (self.commit_loader)(&parent_a)?;
            commit_b = (self.commit_loader)(&parent_b)?;
        }

        for entry_a in chain_a.iter().rev() {
            let Some(parent_a) = &entry_a.parent else {
                continue;
            };

            let matched = chain_b
                .iter()
                .rev()
                .filter_map(|entry_b| entry_b.parent.as_ref())
                .any(|parent_b| parent_a.loosely_matches(parent_b.as_ref()));
            if matched {
                return Ok(Some(entry_a.oid.clone()));
            }
        }

        Ok(None)
    }

    fn nearest_common_ancestor(
        &self,
        a: &ObjectId,
        b: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let ancestors_of_b = self.ancestors(b)?;

        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([a.clone()]);
        while let Some(oid) = queue.pop_front() {
            if ancestors_of_b.contains(&oid) {
                return Ok(Some(oid));
            }
            if !visited.insert(oid.clone()) {
                continue;
            }

            let commit = (self.commit_loader)(&oid)?;
            queue.extend(commit.parents().cloned());
        }

        Ok(None)
    }

    /// `tip` and everything reachable from it
    fn ancestors(&self, tip: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        let mut ancestors = HashSet::new();
        let mut queue = VecDeque::from([tip.clone()]);

        while let Some(oid) = queue.pop_front() {
            if !ancestors.insert(oid.clone()) {
                continue;
            }

            let commit = (self.commit_loader)(&oid)?;
            queue.extend(commit.parents().cloned());
        }

        Ok(ancestors)
    }
}
