use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Repository directory, never part of the working tree
pub const REPOSITORY_DIR: &str = ".twig";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if `file_path` is a regular file in the working tree
    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn is_dir(&self, dir_path: &Path) -> bool {
        self.path.join(dir_path).is_dir()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);
        let content = std::fs::read(&full_path)
            .with_context(|| format!("Unable to read file {}", full_path.display()))?;

        Ok(Bytes::from(content))
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    /// Write `content` to `file_path`, creating missing parent directories
    pub fn write_file(&self, file_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path).with_context(|| {
                format!("Failed to remove existing directory: {:?}", file_path)
            })?;
        }
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        std::fs::write(&full_path, content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Delete `file_path` if present, then drop parent directories left empty
    pub fn delete_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);
        if !full_path.is_file() {
            return Ok(());
        }

        std::fs::remove_file(&full_path)
            .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        self.prune_empty_parent_dirs(&full_path)
    }

    /// Every file of the working tree relative to the root, sorted, with the
    /// repository directory skipped
    pub fn list_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        self.list_files_under(Path::new(""))
    }

    /// Files below `dir_path`, relative to the working tree root and sorted
    pub fn list_files_under(&self, dir_path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = WalkDir::new(self.path.join(dir_path))
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != REPOSITORY_DIR)
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    /// Deletions run before writes so that a file replacing a directory of
    /// the old snapshot lands on a clean path.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for file_path in migration.deletes() {
            self.delete_file(file_path)?;
        }

        for (file_path, oid) in migration.writes() {
            let blob = migration.load_blob(oid)?;
            self.write_file(file_path, blob.content())?;
        }

        tracing::debug!(
            written = migration.writes().len(),
            deleted = migration.deletes().len(),
            "applied checkout migration"
        );

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}
