use crate::areas::repository::Repository;
use crate::artifacts::diff::diff_target::{DiffTarget, PatchLine, file_patch};
use crate::artifacts::objects::commit::Snapshot;
use crate::errors::TwigError;
use colored::Colorize;
use std::collections::BTreeSet;
use std::io::Write;

impl Repository {
    /// Line diff between branches and the working tree
    ///
    /// - no branch: the current branch against the working tree
    /// - one branch: that branch against the working tree
    /// - two branches: the first branch against the second
    ///
    /// Against the working tree only the branch's tracked files are compared.
    pub fn diff(&self, branches: &[String]) -> anyhow::Result<()> {
        match branches {
            [] => {
                let (_, head) = self.head_commit()?;
                self.diff_snapshot_workspace(head.snapshot())
            }
            [branch] => {
                let snapshot = self.branch_snapshot(branch, TwigError::BranchNotFound)?;
                self.diff_snapshot_workspace(&snapshot)
            }
            [first, second] => {
                let first = self.branch_snapshot(first, TwigError::DiffBranchesNotFound)?;
                let second = self.branch_snapshot(second, TwigError::DiffBranchesNotFound)?;
                self.diff_snapshots(&first, &second)
            }
            _ => Err(TwigError::IncorrectOperands.into()),
        }
    }

    fn branch_snapshot(&self, branch: &str, missing: TwigError) -> anyhow::Result<Snapshot> {
        let branch_name = self.find_branch(branch, missing.clone())?;
        let oid = self.refs().read_branch(&branch_name)?.ok_or(missing)?;

        Ok(self.database().load_commit(&oid)?.snapshot().clone())
    }

    fn diff_snapshot_workspace(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        for file in snapshot.keys() {
            self.print_diff(
                &DiffTarget::from_snapshot(file, snapshot, self.database())?,
                &DiffTarget::from_file(file, self.workspace())?,
            )?;
        }

        Ok(())
    }

    fn diff_snapshots(&self, a: &Snapshot, b: &Snapshot) -> anyhow::Result<()> {
        let files = a.keys().chain(b.keys()).collect::<BTreeSet<_>>();

        for file in files {
            self.print_diff(
                &DiffTarget::from_snapshot(file, a, self.database())?,
                &DiffTarget::from_snapshot(file, b, self.database())?,
            )?;
        }

        Ok(())
    }

    fn print_diff(&self, a: &DiffTarget, b: &DiffTarget) -> anyhow::Result<()> {
        let Some(patch) = file_patch(a, b) else {
            return Ok(());
        };

        let mut writer = self.writer();
        for line in &patch {
            match line {
                PatchLine::FileHeader(text) => writeln!(writer, "{}", text.bold())?,
                PatchLine::HunkHeader(text) => writeln!(writer, "{}", text.cyan())?,
                PatchLine::Deletion(text) => writeln!(writer, "{}", text.red())?,
                PatchLine::Insertion(text) => writeln!(writer, "{}", text.green())?,
            }
        }

        Ok(())
    }
}
