use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::TwigError;
use std::path::PathBuf;

impl Repository {
    /// Stage the current content of `file`
    ///
    /// Content equal to the current commit's version leaves nothing to
    /// commit, so any pending stage for the path is dropped instead.
    pub async fn add(&mut self, file: &str) -> anyhow::Result<()> {
        let path = PathBuf::from(file);
        if !self.workspace().exists(&path) {
            return Err(TwigError::FileNotFound.into());
        }

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;
        self.database().store(&blob)?;

        let (_, head) = self.head_commit()?;
        if head.blob_at(&path) == Some(&blob_id) {
            index.unstage(&path);
            tracing::debug!(path = %path.display(), "content matches HEAD, unstaged");
        } else {
            index.stage_addition(path, blob_id);
        }

        index.write_updates()?;

        Ok(())
    }
}
