use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        if message.is_empty() {
            return Err(TwigError::MissingCommitMessage.into());
        }

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;
        if index.is_empty() {
            return Err(TwigError::NothingToCommit.into());
        }

        let branch = self.refs().current_branch()?;
        let (parent_oid, parent) = self.head_commit()?;
        let snapshot = index.fold_onto(parent.snapshot());

        let (commit_oid, _) =
            self.graph()
                .create_commit(message, Some(parent_oid), None, snapshot)?;
        self.refs().update_branch(&branch, &commit_oid)?;

        index.reset();
        index.write_updates()?;

        Ok(commit_oid)
    }
}
