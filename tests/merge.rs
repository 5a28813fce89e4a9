use crate::common::command::{
    commit_file, diverged_repository_dir, get_branch_commit_sha, get_head_commit_sha,
    init_repository_dir, repository_dir, run_twig_command, twig_commit, twig_output,
};
use crate::common::file::{FileSpec, write_file};
use crate::common::read_file;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

mod common;

const UNTRACKED_IN_THE_WAY: &str =
    "There is an untracked file in the way; delete it, or add and commit it first.\n";

fn merge_with_ancestors(dir: &Path, branch: &str) -> assert_cmd::assert::Assert {
    run_twig_command(dir, &["merge", branch])
        .env("TWIG_SPLIT_POINT", "ancestors")
        .assert()
}

#[rstest]
fn unrelated_chains_conflict_on_both_sides(
    diverged_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = diverged_repository_dir.path();
    let master = get_head_commit_sha(dir)?;
    let feat = get_branch_commit_sha(dir, "feat")?;

    run_twig_command(dir, &["merge", "feat"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(dir, "a.txt"),
        "<<<<<<< HEAD\nhi\n=======\nbye\n>>>>>>>\n"
    );

    let log = twig_output(dir, &["log"]);
    assert!(log.contains(&format!(
        "\nMerge: {} {}\nDate: Thu Jan 1 00:00:00 1970 -0800\nMerged feat into master.\n\n",
        &master[..7],
        &feat[..7]
    )));
    assert!(twig_output(dir, &["status"]).contains("a.txt (modified)"));

    Ok(())
}

#[rstest]
fn diverged_branches_take_one_sided_changes(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_twig_command(dir, &["init"]).assert().success();
    for (name, content) in [("a.txt", "a\n"), ("b.txt", "b\n"), ("c.txt", "c\n")] {
        write_file(FileSpec::new(dir.join(name), content.to_string()));
        run_twig_command(dir, &["add", name]).assert().success();
    }
    twig_commit(dir, "base").assert().success();

    run_twig_command(dir, &["branch", "feat"]).assert().success();
    commit_file(dir, "b.txt", "master b\n", "master edits b");

    run_twig_command(dir, &["checkout", "feat"]).assert().success();
    write_file(FileSpec::new(dir.join("a.txt"), "feat a\n".to_string()));
    write_file(FileSpec::new(dir.join("d.txt"), "d\n".to_string()));
    run_twig_command(dir, &["add", "a.txt"]).assert().success();
    run_twig_command(dir, &["add", "d.txt"]).assert().success();
    run_twig_command(dir, &["rm", "c.txt"]).assert().success();
    twig_commit(dir, "feat edits a, adds d, drops c").assert().success();

    run_twig_command(dir, &["checkout", "master"]).assert().success();
    run_twig_command(dir, &["merge", "feat"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(read_file(dir, "a.txt"), "feat a\n");
    assert_eq!(read_file(dir, "b.txt"), "master b\n");
    assert_eq!(read_file(dir, "d.txt"), "d\n");
    assert!(!dir.join("c.txt").exists());

    assert_eq!(
        twig_output(dir, &["status"]),
        "=== Branches ===\nfeat\n*master\n\n\
=== Staged Files ===\n\n\
=== Removed Files ===\n\n\
=== Modifications Not Staged For Commit ===\n\n\
=== Untracked Files ===\n\n"
    );
    assert!(twig_output(dir, &["log"]).contains("\nMerged feat into master.\n\n"));

    Ok(())
}

#[rstest]
fn ancestor_branches_are_already_merged(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "old"]).assert().success();
    commit_file(dir, "b.txt", "b\n", "second");
    let head = get_head_commit_sha(dir)?;

    merge_with_ancestors(dir, "old")
        .success()
        .stdout("Given branch is an ancestor of the current branch.\n");

    assert_eq!(get_head_commit_sha(dir)?, head);

    Ok(())
}

#[rstest]
fn first_parent_search_detects_ancestors_on_deep_chains(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    commit_file(dir, "b.txt", "b\n", "second");
    run_twig_command(dir, &["branch", "old"]).assert().success();
    commit_file(dir, "c.txt", "c\n", "third");

    run_twig_command(dir, &["merge", "old"])
        .assert()
        .success()
        .stdout("Given branch is an ancestor of the current branch.\n");

    Ok(())
}

#[rstest]
fn descendant_branches_fast_forward(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "ahead"]).assert().success();
    run_twig_command(dir, &["checkout", "ahead"]).assert().success();
    commit_file(dir, "a.txt", "newer\n", "edit a");
    commit_file(dir, "b.txt", "b\n", "add b");
    let ahead = get_head_commit_sha(dir)?;
    run_twig_command(dir, &["checkout", "master"]).assert().success();

    merge_with_ancestors(dir, "ahead")
        .success()
        .stdout("Current branch fast-forwarded.\n");

    assert_eq!(get_branch_commit_sha(dir, "master")?, ahead);
    assert_eq!(read_file(dir, "a.txt"), "newer\n");
    assert_eq!(read_file(dir, "b.txt"), "b\n");
    assert_eq!(
        std::fs::read_to_string(dir.join(".twig/HEAD"))?,
        "ref: refs/heads/master"
    );

    Ok(())
}

#[rstest]
fn merge_preconditions(diverged_repository_dir: TempDir) {
    let dir = diverged_repository_dir.path();

    run_twig_command(dir, &["merge", "master"])
        .assert()
        .success()
        .stdout("Cannot merge a branch with itself.\n");
    run_twig_command(dir, &["merge", "nowhere"])
        .assert()
        .success()
        .stdout("A branch with that name does not exist.\n");

    write_file(FileSpec::new(dir.join("pending.txt"), "p\n".to_string()));
    run_twig_command(dir, &["add", "pending.txt"]).assert().success();
    run_twig_command(dir, &["merge", "feat"])
        .assert()
        .success()
        .stdout("You have uncommitted changes.\n");
    assert_eq!(read_file(dir, "a.txt"), "hi\n");
}

#[rstest]
fn untracked_files_block_a_merge(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "other"]).assert().success();
    run_twig_command(dir, &["checkout", "other"]).assert().success();
    commit_file(dir, "b.txt", "theirs\n", "add b");
    run_twig_command(dir, &["checkout", "master"]).assert().success();
    let head = get_head_commit_sha(dir)?;

    write_file(FileSpec::new(dir.join("b.txt"), "mine\n".to_string()));
    run_twig_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout(UNTRACKED_IN_THE_WAY);

    assert_eq!(read_file(dir, "b.txt"), "mine\n");
    assert_eq!(get_head_commit_sha(dir)?, head);

    Ok(())
}

#[rstest]
fn untracked_directories_block_a_merge(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "other"]).assert().success();
    run_twig_command(dir, &["checkout", "other"]).assert().success();
    commit_file(dir, "notes", "theirs\n", "add notes");
    run_twig_command(dir, &["checkout", "master"]).assert().success();
    let head = get_head_commit_sha(dir)?;

    write_file(FileSpec::new(
        dir.join("notes/todo.txt"),
        "precious\n".to_string(),
    ));
    run_twig_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout(UNTRACKED_IN_THE_WAY);

    assert_eq!(read_file(dir, "notes/todo.txt"), "precious\n");
    assert_eq!(get_head_commit_sha(dir)?, head);

    Ok(())
}
