use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Content-addressed object store, split in a blob area and a commit area
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn init(&self) -> anyhow::Result<()> {
        for object_type in [ObjectType::Blob, ObjectType::Commit] {
            let area = self.area_path(object_type);
            std::fs::create_dir_all(&area)
                .with_context(|| format!("Unable to create object area {}", area.display()))?;
        }

        Ok(())
    }

    /// Persist `object` unless an object with the same id is already stored
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object.object_path()?);

        if object_path.exists() {
            tracing::debug!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("Unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(&object_path, object.serialize()?)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let reader = self.open_object(ObjectType::Blob, object_id)?;
        Blob::deserialize(reader)
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let reader = self.open_object(ObjectType::Commit, object_id)?;
        Commit::deserialize(reader)
            .with_context(|| format!("Unable to parse commit {object_id}"))
    }

    pub fn contains_commit(&self, object_id: &ObjectId) -> bool {
        self.area_path(ObjectType::Commit)
            .join(object_id.to_path())
            .is_file()
    }

    /// Resolve a possibly abbreviated commit id to the first stored commit
    /// (in id order) whose id starts with `prefix`.
    pub fn resolve_abbreviated(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(TwigError::CommitNotFound.into());
        }

        let resolved = self
            .list_commits()?
            .into_iter()
            .find(|oid| oid.as_ref().starts_with(&prefix))
            .ok_or(TwigError::CommitNotFound)?;
        tracing::debug!(%prefix, oid = %resolved, "resolved abbreviated commit id");

        Ok(resolved)
    }

    /// Every stored commit id, sorted
    pub fn list_commits(&self) -> anyhow::Result<Vec<ObjectId>> {
        let area = self.area_path(ObjectType::Commit);
        let mut commits = Vec::new();

        for entry in WalkDir::new(&area).min_depth(2).max_depth(2) {
            let entry = entry.with_context(|| format!("Unable to list {}", area.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&area)?;
            let full_oid = relative
                .iter()
                .map(|component| component.to_string_lossy())
                .collect::<String>();
            // temp files left by an interrupted write are not objects
            if let Ok(oid) = ObjectId::try_parse(full_oid) {
                commits.push(oid);
            }
        }

        commits.sort();
        Ok(commits)
    }

    fn area_path(&self, object_type: ObjectType) -> PathBuf {
        self.path.join(object_type.area())
    }

    fn open_object(
        &self,
        expected: ObjectType,
        object_id: &ObjectId,
    ) -> anyhow::Result<impl BufRead> {
        let object_path = self.area_path(expected).join(object_id.to_path());
        if !object_path.is_file() {
            return Err(TwigError::ObjectNotFound(object_id.clone()).into());
        }

        let object_content = self.read_object(&object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let (object_type, _) = ObjectType::parse_header(&mut object_reader)
            .with_context(|| format!("Corrupt object header in {}", object_path.display()))?;
        if object_type != expected {
            anyhow::bail!("Object {object_id} is a {object_type}, expected a {expected}");
        }

        Ok(object_reader)
    }

    fn read_object(&self, object_path: &Path) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(object_path)
            .with_context(|| format!("Unable to read object file {}", object_path.display()))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("Unable to open object file {}", temp_object_path.display())
            })?;
        file.write_all(&object_content).with_context(|| {
            format!("Unable to write object file {}", temp_object_path.display())
        })?;

        // the rename publishes the object in one step
        std::fs::rename(&temp_object_path, object_path).with_context(|| {
            format!("Unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(Bytes::from)
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::{Snapshot, repository_epoch};
    use crate::errors::find_twig_error;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn database() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        database.init().unwrap();
        (dir, database)
    }

    fn commit(message: &str) -> Commit {
        Commit::new(
            None,
            None,
            repository_epoch().unwrap(),
            Snapshot::new(),
            message.to_string(),
        )
    }

    #[rstest]
    fn storing_twice_keeps_one_object(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let blob = Blob::from("same bytes\n");

        let first = database.store(&blob).unwrap();
        let second = database.store(&blob).unwrap();

        assert_eq!(first, second);
        assert_eq!(database.load_blob(&first).unwrap(), blob);
    }

    #[rstest]
    fn missing_objects_are_not_found(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let oid = Blob::from("never stored").object_id().unwrap();

        let error = database.load_blob(&oid).unwrap_err();
        assert_eq!(
            find_twig_error(&error),
            Some(&TwigError::ObjectNotFound(oid))
        );
    }

    #[rstest]
    fn blobs_are_not_commits(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let oid = database.store(&Blob::from("text")).unwrap();

        assert!(database.load_commit(&oid).is_err());
        assert!(database.list_commits().unwrap().is_empty());
    }

    #[rstest]
    fn abbreviated_ids_resolve_to_the_first_match(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let mut ids = ["one", "two", "three"]
            .into_iter()
            .map(|message| database.store(&commit(message)).unwrap())
            .collect::<Vec<_>>();
        ids.sort();

        assert_eq!(database.list_commits().unwrap(), ids);
        assert_eq!(
            database.resolve_abbreviated(&ids[1].to_short_oid()).unwrap(),
            ids[1]
        );
        assert_eq!(database.resolve_abbreviated(ids[2].as_ref()).unwrap(), ids[2]);
        assert!(database.load_commit(&ids[0]).unwrap().is_root());
    }

    #[rstest]
    #[case("")]
    #[case("zzzz")]
    fn unknown_prefixes_are_rejected(database: (TempDir, Database), #[case] prefix: &str) {
        let (_dir, database) = database;
        database.store(&commit("only")).unwrap();

        let error = database.resolve_abbreviated(prefix).unwrap_err();
        assert_eq!(find_twig_error(&error), Some(&TwigError::CommitNotFound));
    }
}
