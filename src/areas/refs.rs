//! Branch pointers and HEAD
//!
//! Branches live at `refs/heads/<name>` and hold a 40-character commit id.
//! HEAD is always symbolic: `ref: refs/heads/<name>`.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (`.twig`)
    path: Box<Path>,
}

impl Refs {
    /// Create the heads directory, the first branch and point HEAD at it
    pub fn init(&self, branch_name: &BranchName, root: &ObjectId) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.heads_path()).with_context(|| {
            format!("failed to create heads directory at {:?}", self.heads_path())
        })?;

        self.update_branch(branch_name, root)?;
        self.set_head(branch_name)
    }

    /// Branch HEAD points to
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let content = self.read_ref_file(&self.head_path())?;

        let symref = regex::Regex::new(SYMREF_REGEX)?;
        let target = symref
            .captures(content.trim())
            .and_then(|captures| captures.get(1))
            .with_context(|| format!("HEAD is not a symbolic ref: {content:?}"))?;

        BranchName::try_parse_ref_target(target.as_str())
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == branch_name)
    }

    /// Commit the current branch points to
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        let current = self.current_branch()?;
        self.read_branch(&current)?
            .with_context(|| format!("HEAD points to missing branch {current}"))
    }

    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.write_ref_file(&self.head_path(), &format!("ref: {}", branch_name.ref_target()))?;
        tracing::debug!(branch = %branch_name, "moved HEAD");

        Ok(())
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch_name);
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = self.read_ref_file(&branch_path)?;
        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.write_ref_file(&self.branch_path(branch_name), oid.as_ref())?;
        tracing::debug!(branch = %branch_name, %oid, "updated branch");

        Ok(())
    }

    pub fn create_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(branch_name) {
            return Err(TwigError::BranchExists.into());
        }

        self.update_branch(branch_name, oid)
    }

    pub fn delete_branch(&self, branch_name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.branch_path(branch_name);
        let oid = self
            .read_branch(branch_name)?
            .ok_or(TwigError::BranchNotFound)?;

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;
        tracing::debug!(branch = %branch_name, %oid, "deleted branch");

        Ok(oid)
    }

    /// All branch names, sorted
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                BranchName::try_parse(relative_path.to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();

        branches.sort();
        Ok(branches)
    }

    fn read_ref_file(&self, path: &Path) -> anyhow::Result<String> {
        let mut ref_file = std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Shared, 0, 1)?;

        let mut content = String::new();
        lock.deref_mut()
            .read_to_string(&mut content)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;

        Ok(content)
    }

    fn write_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {:?}", path)
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.heads_path().join(branch_name.as_ref()).into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.path.join("refs").join("heads").into_boxed_path()
    }
}
