use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// First-parent history from HEAD down to the root commit
    pub fn log(&self) -> anyhow::Result<()> {
        let (head_oid, _) = self.head_commit()?;

        for (commit_oid, commit) in self.graph().first_parent_history(&head_oid)? {
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    /// Every stored commit, in id order
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit_oid in self.database().list_commits()? {
            let commit = self.database().load_commit(&commit_oid)?;
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    pub fn display_commit(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "commit {}", commit_oid)?;
        if let (Some(parent), Some(merge_parent)) = (commit.parent(), commit.merge_parent()) {
            writeln!(
                writer,
                "Merge: {} {}",
                parent.to_short_oid(),
                merge_parent.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
