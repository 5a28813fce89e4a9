use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Planned working-directory changes for a snapshot switch
#[derive(Debug)]
pub struct Migration<'r> {
    database: &'r Database,
    /// Every file of the target snapshot
    writes: BTreeMap<PathBuf, ObjectId>,
    /// Files tracked now that the target does not have
    deletes: BTreeSet<PathBuf>,
}

impl<'r> Migration<'r> {
    /// Plan the switch from `current` to `target`
    ///
    /// Fails with [`TwigError::UntrackedFileInTheWay`] when a file the target
    /// tracks, but the current snapshot does not, exists in the working
    /// directory.
    pub fn plan(
        database: &'r Database,
        workspace: &Workspace,
        current: &Snapshot,
        target: &Snapshot,
    ) -> anyhow::Result<Self> {
        if let Some(path) = untracked_in_the_way(workspace, current, target)? {
            tracing::debug!(path = %path.display(), "untracked file blocks the checkout");
            return Err(TwigError::UntrackedFileInTheWay.into());
        }

        let deletes = current
            .keys()
            .filter(|path| !target.contains_key(*path))
            .cloned()
            .collect();

        Ok(Migration {
            database,
            writes: target.clone(),
            deletes,
        })
    }

    pub fn writes(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.writes
    }

    pub fn deletes(&self) -> &BTreeSet<PathBuf> {
        &self.deletes
    }

    pub fn load_blob(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
        self.database.load_blob(oid)
    }
}

/// First untracked path a switch from `current` to `target` would clobber
///
/// A target path is blocked by an untracked file at that path, by untracked
/// files inside a directory at that path, or by an untracked file where one
/// of its parent directories has to go.
pub fn untracked_in_the_way(
    workspace: &Workspace,
    current: &Snapshot,
    target: &Snapshot,
) -> anyhow::Result<Option<PathBuf>> {
    let untracked = |path: &Path| !current.contains_key(path);

    for path in target.keys() {
        if workspace.exists(path) && untracked(path) {
            return Ok(Some(path.clone()));
        }

        if workspace.is_dir(path)
            && let Some(file) = workspace
                .list_files_under(path)?
                .into_iter()
                .find(|file| untracked(file))
        {
            return Ok(Some(file));
        }

        let blocking_parent = path
            .ancestors()
            .skip(1)
            .filter(|parent| !parent.as_os_str().is_empty())
            .find(|parent| workspace.exists(parent) && untracked(parent));
        if let Some(parent) = blocking_parent {
            return Ok(Some(parent.to_path_buf()));
        }
    }

    Ok(None)
}
