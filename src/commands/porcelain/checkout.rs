use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Commit;
use crate::errors::TwigError;
use std::path::{Path, PathBuf};

/// The three forms of `checkout`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTarget {
    /// `checkout -- <file>`: restore from the current commit
    HeadFile(PathBuf),
    /// `checkout <commit> -- <file>`: restore from an abbreviated commit id
    CommitFile { commit: String, file: PathBuf },
    /// `checkout <branch>`: switch branches
    Branch(String),
}

impl CheckoutTarget {
    /// Build from the operand before `--` and the one after it
    pub fn from_operands(target: Option<String>, file: Option<String>) -> anyhow::Result<Self> {
        match (target, file) {
            (None, Some(file)) => Ok(CheckoutTarget::HeadFile(PathBuf::from(file))),
            (Some(commit), Some(file)) => Ok(CheckoutTarget::CommitFile {
                commit,
                file: PathBuf::from(file),
            }),
            (Some(branch), None) => Ok(CheckoutTarget::Branch(branch)),
            (None, None) => Err(TwigError::IncorrectOperands.into()),
        }
    }
}

impl Repository {
    pub async fn checkout(&mut self, target: CheckoutTarget) -> anyhow::Result<()> {
        match target {
            CheckoutTarget::HeadFile(file) => {
                let (_, head) = self.head_commit()?;
                self.restore_file(&head, &file)
            }
            CheckoutTarget::CommitFile { commit, file } => {
                let (_, commit) = self.resolve_commit(&commit)?;
                self.restore_file(&commit, &file)
            }
            CheckoutTarget::Branch(branch) => self.checkout_branch(&branch).await,
        }
    }

    /// Overwrite `file` with its version in `commit`; the index is untouched
    fn restore_file(&self, commit: &Commit, file: &Path) -> anyhow::Result<()> {
        let blob_oid = commit.blob_at(file).ok_or(TwigError::FileNotInCommit)?;
        let blob = self.database().load_blob(blob_oid)?;

        self.workspace().write_file(file, blob.content())
    }

    async fn checkout_branch(&mut self, branch: &str) -> anyhow::Result<()> {
        let branch_name = self.find_branch(branch, TwigError::CheckoutBranchNotFound)?;
        if self.refs().is_current_branch(&branch_name)? {
            return Err(TwigError::CheckoutCurrentBranch.into());
        }

        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or(TwigError::CheckoutBranchNotFound)?;
        let target = self.database().load_commit(&target_oid)?;
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

        index.reset();
        index.write_updates()?;
        self.refs().set_head(&branch_name)?;
        tracing::info!(branch = %branch_name, commit = %target_oid, "switched branch");

        Ok(())
    }
}
