use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{FileSet, StatusInfo};
use std::io::Write;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, head) = self.head_commit()?;
        let status_info = StatusInfo::collect(head.snapshot(), &index, self.workspace())?;

        self.print_branches()?;
        self.print_section("Staged Files", display_paths(&status_info.staged_files))?;
        self.print_section("Removed Files", display_paths(&status_info.removed_files))?;
        self.print_section(
            "Modifications Not Staged For Commit",
            status_info
                .workspace_changeset
                .iter()
                .map(|(file, change)| format!("{} {}", file.display(), change)),
        )?;
        self.print_section("Untracked Files", display_paths(&status_info.untracked_files))?;

        Ok(())
    }

    fn print_branches(&self) -> anyhow::Result<()> {
        let current = self.refs().current_branch()?;
        let branches = self
            .refs()
            .list_branches()?
            .into_iter()
            .map(|branch| match branch == current {
                true => format!("*{branch}"),
                false => branch.to_string(),
            })
            .collect::<Vec<_>>();

        self.print_section("Branches", branches)
    }

    fn print_section(
        &self,
        title: &str,
        entries: impl IntoIterator<Item = String>,
    ) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "=== {title} ===")?;
        for entry in entries {
            writeln!(writer, "{entry}")?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

fn display_paths(files: &FileSet) -> impl Iterator<Item = String> + '_ {
    files.iter().map(|file| file.display().to_string())
}
