use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::diff::diff_algorithm::{DiffAlgorithm, MyersDiff};
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::path::{Path, PathBuf};

const NULL_PATH: &str = "/dev/null";

pub type LineSet = Vec<String>;

/// One side of a file comparison; `oid` is None when the file is absent
#[derive(Debug, Clone, new)]
pub struct DiffTarget {
    pub(crate) file: PathBuf,
    pub(crate) oid: Option<ObjectId>,
    pub(crate) data: LineSet,
}

impl DiffTarget {
    pub fn from_snapshot(
        file: &Path,
        snapshot: &Snapshot,
        database: &Database,
    ) -> anyhow::Result<Self> {
        match snapshot.get(file) {
            Some(oid) => {
                let blob = database.load_blob(oid)?;
                Ok(Self::new(file.to_path_buf(), Some(oid.clone()), blob.lines()))
            }
            None => Ok(Self::from_nothing(file)),
        }
    }

    pub fn from_file(file: &Path, workspace: &Workspace) -> anyhow::Result<Self> {
        if !workspace.exists(file) {
            return Ok(Self::from_nothing(file));
        }

        let blob = workspace.parse_blob(file)?;
        Ok(Self::new(
            file.to_path_buf(),
            Some(blob.object_id()?),
            blob.lines(),
        ))
    }

    pub fn from_nothing(file: &Path) -> Self {
        Self::new(file.to_path_buf(), None, Vec::new())
    }

    pub fn exists(&self) -> bool {
        self.oid.is_some()
    }

    /// `<prefix>/<file>`, or `/dev/null` for an absent file
    fn diff_path(&self, prefix: &str) -> String {
        if self.exists() {
            format!("{prefix}/{}", self.file.display())
        } else {
            NULL_PATH.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchLine {
    /// `diff --git`, `---` and `+++` lines
    FileHeader(String),
    HunkHeader(String),
    Deletion(String),
    Insertion(String),
}

impl PatchLine {
    pub fn text(&self) -> &str {
        match self {
            PatchLine::FileHeader(text)
            | PatchLine::HunkHeader(text)
            | PatchLine::Deletion(text)
            | PatchLine::Insertion(text) => text,
        }
    }
}

/// Patch between two versions of a file, None when their content is equal
pub fn file_patch(a: &DiffTarget, b: &DiffTarget) -> Option<Vec<PatchLine>> {
    if a.oid == b.oid {
        return None;
    }

    let (old_path, new_path) = (a.diff_path("a"), b.diff_path("b"));
    let mut lines = vec![
        PatchLine::FileHeader(format!("diff --git {old_path} {new_path}")),
        PatchLine::FileHeader(format!("--- {old_path}")),
        PatchLine::FileHeader(format!("+++ {new_path}")),
    ];

    for hunk in MyersDiff::new(&a.data, &b.data).hunks() {
        lines.push(PatchLine::HunkHeader(hunk.header()));
        lines.extend(
            a.data[hunk.old_start..hunk.old_start + hunk.old_len]
                .iter()
                .map(|line| PatchLine::Deletion(format!("-{line}"))),
        );
        lines.extend(
            b.data[hunk.new_start..hunk.new_start + hunk.new_len]
                .iter()
                .map(|line| PatchLine::Insertion(format!("+{line}"))),
        );
    }

    Some(lines)
}
