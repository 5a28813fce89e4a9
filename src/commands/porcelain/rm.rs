use crate::areas::repository::Repository;
use crate::errors::TwigError;
use std::path::PathBuf;

impl Repository {
    /// Unstage a pending addition and, when the current commit tracks the
    /// file, stage its removal and delete it from the working tree
    pub async fn rm(&mut self, file: &str) -> anyhow::Result<()> {
        let path = PathBuf::from(file);

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let was_staged = index.is_staged_for_addition(&path);
        let (_, head) = self.head_commit()?;

        match head.blob_at(&path) {
            Some(tracked_oid) => {
                index.stage_removal(path.clone(), tracked_oid.clone());
                self.workspace().delete_file(&path)?;
            }
            None if was_staged => {
                index.unstage(&path);
            }
            None => return Err(TwigError::NothingToRemove.into()),
        }

        index.write_updates()?;

        Ok(())
    }
}
