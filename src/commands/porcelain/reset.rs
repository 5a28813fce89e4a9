use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;

impl Repository {
    /// Check out every file of the commit named by `commit_id` and move the
    /// current branch to it
    pub async fn reset(&mut self, commit_id: &str) -> anyhow::Result<()> {
        let (target_oid, target) = self.resolve_commit(commit_id)?;
        let branch = self.refs().current_branch()?;
        let (_, current) = self.head_commit()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let migration = Migration::plan(
            self.database(),
            self.workspace(),
            current.snapshot(),
            target.snapshot(),
        )?;
        self.workspace().apply_migration(&migration)?;

        self.refs().update_branch(&branch, &target_oid)?;
        index.reset();
        index.write_updates()?;
        tracing::info!(%branch, commit = %target_oid, "reset branch");

        Ok(())
    }
}
