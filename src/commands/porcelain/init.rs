use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::TwigError;
use anyhow::Context;

impl Repository {
    /// Create `.twig`, the root commit and the default branch pointing at it
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(TwigError::AlreadyInitialized.into());
        }

        self.database()
            .init()
            .context("Failed to create .twig/objects directory")?;

        let (root_oid, _) = self.graph().create_root_commit()?;
        self.refs()
            .init(&BranchName::default_branch(), &root_oid)
            .context("Failed to create the default branch")?;

        let index = self.index();
        let mut index = index.lock().await;
        index.reset();
        index
            .write_updates()
            .context("Failed to create .twig/index file")?;

        tracing::info!(path = %self.path().display(), root = %root_oid, "initialized repository");

        Ok(())
    }
}
