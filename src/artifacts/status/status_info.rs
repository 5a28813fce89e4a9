use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

/// Status sections of one repository state, every section sorted by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    /// Compare the working directory against the current commit's snapshot
    /// and the staging index
    ///
    /// - a file staged for addition is modified when its content differs from
    ///   the staged blob, and deleted when it is gone
    /// - a tracked file with no pending stage is modified when its content
    ///   differs from the commit, and deleted when it is gone
    /// - a file is untracked when it is neither staged for addition nor
    ///   tracked, or when it reappeared after being staged for removal
    pub fn collect(head: &Snapshot, index: &Index, workspace: &Workspace) -> anyhow::Result<Self> {
        let files = workspace
            .list_files()?
            .into_iter()
            .map(|file| {
                let oid = workspace.parse_blob(&file)?.object_id()?;
                Ok((file, oid))
            })
            .collect::<anyhow::Result<BTreeMap<PathBuf, ObjectId>>>()?;

        let mut workspace_changeset = ChangeSet::new();
        for (file, staged_oid) in index.additions() {
            match files.get(file) {
                None => {
                    workspace_changeset.insert(file.clone(), WorkspaceChangeType::Deleted);
                }
                Some(oid) if oid != staged_oid => {
                    workspace_changeset.insert(file.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }
        for (file, tracked_oid) in head {
            if index.is_staged_for_addition(file) || index.is_staged_for_removal(file) {
                continue;
            }
            match files.get(file) {
                None => {
                    workspace_changeset.insert(file.clone(), WorkspaceChangeType::Deleted);
                }
                Some(oid) if oid != tracked_oid => {
                    workspace_changeset.insert(file.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        let untracked_files = files
            .keys()
            .filter(|file| !index.is_staged_for_addition(file))
            .filter(|file| !head.contains_key(*file) || index.is_staged_for_removal(file))
            .cloned()
            .collect();

        Ok(StatusInfo {
            staged_files: index.additions().keys().cloned().collect(),
            removed_files: index.removals().keys().cloned().collect(),
            workspace_changeset,
            untracked_files,
        })
    }
}
