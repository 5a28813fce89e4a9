//! Staging index
//!
//! Records additions and removals pending since the last commit. A path is
//! staged in at most one of the two maps at a time. The file layout is
//! described in [`crate::artifacts::index`].

use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::index::checksum::HashedStream;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::staged_entry::{StageKind, StagedEntry};
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::BTreeMap;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.twig/index`)
    path: Box<Path>,
    additions: BTreeMap<PathBuf, ObjectId>,
    removals: BTreeMap<PathBuf, ObjectId>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stage_addition(&mut self, path: PathBuf, oid: ObjectId) {
        self.removals.remove(&path);
        self.additions.insert(path, oid);
    }

    pub fn stage_removal(&mut self, path: PathBuf, oid: ObjectId) {
        self.additions.remove(&path);
        self.removals.insert(path, oid);
    }

    /// Drop any pending change for `path`; true if there was one
    pub fn unstage(&mut self, path: &Path) -> bool {
        let added = self.additions.remove(path).is_some();
        let removed = self.removals.remove(path).is_some();

        added || removed
    }

    pub fn additions(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.removals
    }

    pub fn is_staged_for_addition(&self, path: &Path) -> bool {
        self.additions.contains_key(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn reset(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }

    /// Apply the pending changes on top of a parent snapshot
    pub fn fold_onto(&self, parent_snapshot: &Snapshot) -> Snapshot {
        let mut snapshot = parent_snapshot.clone();

        for (path, oid) in &self.additions {
            snapshot.insert(path.clone(), oid.clone());
        }
        for path in self.removals.keys() {
            snapshot.remove(path);
        }

        snapshot
    }

    /// Load the index from disk, verifying its checksum
    ///
    /// A missing or empty file is an empty index. A shared lock is held on
    /// the file while reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = HashedStream::new(lock.deref_mut());
        let header = IndexHeader::deserialize(&reader.read_bytes(HEADER_SIZE)?)?;

        for _ in 0..header.entries_count {
            let entry = StagedEntry::read_from(&mut reader)?;
            match entry.kind {
                StageKind::Addition => self.additions.insert(entry.path, entry.oid),
                StageKind::Removal => self.removals.insert(entry.path, entry.oid),
            };
        }

        reader
            .verify_trailer()
            .with_context(|| format!("Corrupt index file {}", self.path.display()))?;
        tracing::debug!(
            additions = self.additions.len(),
            removals = self.removals.len(),
            "loaded staging index"
        );

        Ok(())
    }

    /// Rewrite the index file under an exclusive lock
    pub fn write_updates(&self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = HashedStream::new(lock.deref_mut());
        let entries = self.entries();

        let entries_count = u32::try_from(entries.len()).context("Too many staged entries")?;
        writer.write_bytes(&IndexHeader::with_count(entries_count).serialize()?)?;
        for entry in &entries {
            writer.write_bytes(&entry.serialize()?)?;
        }
        writer.finish()?;

        tracing::debug!(entries = entries.len(), "wrote staging index");

        Ok(())
    }

    fn entries(&self) -> Vec<StagedEntry> {
        let additions = self
            .additions
            .iter()
            .map(|(path, oid)| StagedEntry::new(StageKind::Addition, path.clone(), oid.clone()));
        let removals = self
            .removals
            .iter()
            .map(|(path, oid)| StagedEntry::new(StageKind::Removal, path.clone(), oid.clone()));

        additions.chain(removals).collect()
    }
}
