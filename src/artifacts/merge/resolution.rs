use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// What a merge does with one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The current side wins, nothing to write
    KeepCurrent,
    /// Only the given side changed the file: write and stage its version
    TakeGiven(ObjectId),
    /// Only the given side deleted the file: delete and stage the removal
    DeleteFile,
    /// Both sides changed the file differently
    Conflict,
}

/// Result of a merge command that passed its preconditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    UpToDate,
    FastForwarded(ObjectId),
    Merged {
        commit: ObjectId,
        conflicts: Vec<PathBuf>,
    },
}

/// Resolve one path from its blob ids in the current, given and split snapshots
pub fn resolve(
    current: Option<&ObjectId>,
    given: Option<&ObjectId>,
    split: Option<&ObjectId>,
) -> Resolution {
    if given == current || given == split {
        return Resolution::KeepCurrent;
    }

    if current == split {
        return match given {
            Some(oid) => Resolution::TakeGiven(oid.clone()),
            None => Resolution::DeleteFile,
        };
    }

    Resolution::Conflict
}

/// Resolutions for the sorted union of paths of the three snapshots, paths
/// kept as they are on the current side left out
pub fn plan(current: &Snapshot, given: &Snapshot, split: &Snapshot) -> BTreeMap<PathBuf, Resolution> {
    let paths = current
        .keys()
        .chain(given.keys())
        .chain(split.keys())
        .collect::<BTreeSet<_>>();

    paths
        .into_iter()
        .filter_map(|path| {
            match resolve(current.get(path), given.get(path), split.get(path)) {
                Resolution::KeepCurrent => None,
                resolution => Some((path.clone(), resolution)),
            }
        })
        .collect()
}

/// Working-directory text of a conflicting path, an absent side being empty
pub fn conflict_text(current: Option<&Blob>, given: Option<&Blob>) -> Bytes {
    let side = |blob: Option<&Blob>| blob.map(|blob| blob.text().into_owned()).unwrap_or_default();

    Bytes::from(format!(
        "<<<<<<< HEAD\n{}=======\n{}>>>>>>>\n",
        side(current),
        side(given)
    ))
}
