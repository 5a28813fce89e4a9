use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::TwigError;

impl Repository {
    /// New branch at the current commit; HEAD stays where it is
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let (head_oid, _) = self.head_commit()?;

        self.refs().create_branch(&branch_name, &head_oid)?;

        Ok(())
    }

    /// Delete the pointer only; commits stay in the store
    pub fn rm_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = self.find_branch(branch_name, TwigError::BranchNotFound)?;
        if self.refs().is_current_branch(&branch_name)? {
            return Err(TwigError::RemoveCurrentBranch.into());
        }

        self.refs().delete_branch(&branch_name)?;

        Ok(())
    }

    /// Existing branch called `name`, or `missing` when there is none
    ///
    /// A name that is not a valid branch name cannot exist either.
    pub(crate) fn find_branch(&self, name: &str, missing: TwigError) -> anyhow::Result<BranchName> {
        match BranchName::try_parse(name.to_string()) {
            Ok(branch_name) if self.refs().branch_exists(&branch_name) => Ok(branch_name),
            _ => Err(missing.into()),
        }
    }
}
