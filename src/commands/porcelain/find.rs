use crate::areas::repository::Repository;
use crate::errors::TwigError;
use std::io::Write;

impl Repository {
    /// Print the id of every commit whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        let mut found = 0;

        for commit_oid in self.database().list_commits()? {
            let commit = self.database().load_commit(&commit_oid)?;
            if commit.message() == message {
                writeln!(self.writer(), "{}", commit_oid)?;
                found += 1;
            }
        }

        if found == 0 {
            return Err(TwigError::NoCommitWithMessage.into());
        }

        Ok(())
    }
}
