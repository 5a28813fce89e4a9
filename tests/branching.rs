use crate::common::command::{
    commit_file, diverged_repository_dir, get_branch_commit_sha, get_head_commit_sha,
    init_repository_dir, run_twig_command, twig_output,
};
use crate::common::file::{FileSpec, delete_file, write_file};
use crate::common::read_file;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn branch_points_at_the_current_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let head = get_head_commit_sha(dir)?;

    run_twig_command(dir, &["branch", "feature/login"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(get_branch_commit_sha(dir, "feature/login")?, head);
    assert_eq!(
        std::fs::read_to_string(dir.join(".twig/HEAD"))?.trim(),
        "ref: refs/heads/master"
    );

    Ok(())
}

#[rstest]
#[case::double_dot("bad..name", "Invalid branch name: bad..name.\n")]
#[case::lock_suffix("topic.lock", "Invalid branch name: topic.lock.\n")]
#[case::existing("master", "A branch with that name already exists.\n")]
fn branch_rejects_bad_names(
    init_repository_dir: TempDir,
    #[case] name: &str,
    #[case] message: &str,
) {
    run_twig_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .success()
        .stdout(message.to_string());
}

#[rstest]
fn rm_branch_deletes_only_the_pointer(
    diverged_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = diverged_repository_dir.path();
    let feat = get_branch_commit_sha(dir, "feat")?;

    run_twig_command(dir, &["rm-branch", "feat"]).assert().success();

    assert!(!dir.join(".twig/refs/heads/feat").exists());
    assert!(twig_output(dir, &["global-log"]).contains(&feat));

    run_twig_command(dir, &["rm-branch", "feat"])
        .assert()
        .success()
        .stdout("A branch with that name does not exist.\n");
    run_twig_command(dir, &["rm-branch", "master"])
        .assert()
        .success()
        .stdout("Cannot remove the current branch.\n");

    Ok(())
}

#[rstest]
fn checkout_restores_files_from_head_and_older_commits(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let first = get_head_commit_sha(dir)?;
    commit_file(dir, "a.txt", "second version\n", "second");

    write_file(FileSpec::new(dir.join("a.txt"), "scratch\n".to_string()));
    run_twig_command(dir, &["checkout", "--", "a.txt"])
        .assert()
        .success();
    assert_eq!(read_file(dir, "a.txt"), "second version\n");

    run_twig_command(dir, &["checkout", &first[..8], "--", "a.txt"])
        .assert()
        .success();
    assert_eq!(read_file(dir, "a.txt"), "hi\n");

    // restoring a file leaves the index alone
    let status = twig_output(dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.contains("a.txt (modified)"));

    Ok(())
}

#[rstest]
fn checkout_file_errors(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_twig_command(dir, &["checkout", "--", "missing.txt"])
        .assert()
        .success()
        .stdout("File does not exist in that commit.\n");
    run_twig_command(dir, &["checkout", "0000000", "--", "a.txt"])
        .assert()
        .success()
        .stdout("No commit with that id exists.\n");
    run_twig_command(dir, &["checkout"])
        .assert()
        .success()
        .stdout("Incorrect operands.\n");
}

#[rstest]
fn switching_branches_rewrites_the_working_tree(diverged_repository_dir: TempDir) {
    let dir = diverged_repository_dir.path();
    assert_eq!(read_file(dir, "a.txt"), "hi\n");

    run_twig_command(dir, &["checkout", "feat"])
        .assert()
        .success()
        .stdout("");
    assert_eq!(read_file(dir, "a.txt"), "bye\n");
    assert!(twig_output(dir, &["status"]).starts_with("=== Branches ===\n*feat\nmaster\n\n"));

    run_twig_command(dir, &["checkout", "master"])
        .assert()
        .success();
    assert_eq!(read_file(dir, "a.txt"), "hi\n");
}

#[rstest]
fn switching_branches_deletes_files_the_target_does_not_track(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "bare"]).assert().success();
    commit_file(dir, "extra.txt", "extra\n", "extra");

    run_twig_command(dir, &["checkout", "bare"])
        .assert()
        .success();

    assert!(!dir.join("extra.txt").exists());
    assert_eq!(read_file(dir, "a.txt"), "hi\n");
}

#[rstest]
fn checkout_branch_errors(diverged_repository_dir: TempDir) {
    let dir = diverged_repository_dir.path();

    run_twig_command(dir, &["checkout", "nowhere"])
        .assert()
        .success()
        .stdout("No such branch exists.\n");
    run_twig_command(dir, &["checkout", "master"])
        .assert()
        .success()
        .stdout("No need to checkout the current branch.\n");
}

#[rstest]
fn untracked_files_block_a_branch_switch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "other"]).assert().success();
    run_twig_command(dir, &["checkout", "other"]).assert().success();
    commit_file(dir, "b.txt", "tracked on other\n", "add b");
    run_twig_command(dir, &["checkout", "master"]).assert().success();
    assert!(!dir.join("b.txt").exists());

    write_file(FileSpec::new(dir.join("b.txt"), "mine\n".to_string()));
    run_twig_command(dir, &["checkout", "other"])
        .assert()
        .success()
        .stdout("There is an untracked file in the way; delete it, or add and commit it first.\n");

    assert_eq!(read_file(dir, "b.txt"), "mine\n");
    assert_eq!(
        std::fs::read_to_string(dir.join(".twig/HEAD"))?.trim(),
        "ref: refs/heads/master"
    );

    Ok(())
}

#[rstest]
fn reset_moves_the_branch_and_the_working_tree(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let first = get_head_commit_sha(dir)?;
    commit_file(dir, "a.txt", "changed\n", "change a");
    commit_file(dir, "b.txt", "b\n", "add b");
    write_file(FileSpec::new(dir.join("c.txt"), "c\n".to_string()));
    run_twig_command(dir, &["add", "c.txt"]).assert().success();

    run_twig_command(dir, &["reset", &first])
        .assert()
        .success()
        .stdout("");

    assert_eq!(get_head_commit_sha(dir)?, first);
    assert_eq!(read_file(dir, "a.txt"), "hi\n");
    assert!(!dir.join("b.txt").exists());

    let status = twig_output(dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.contains("=== Untracked Files ===\nc.txt\n"));

    Ok(())
}

#[rstest]
fn reset_errors(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let head = get_head_commit_sha(dir)?;

    run_twig_command(dir, &["reset", "ffffffff"])
        .assert()
        .success()
        .stdout("No commit with that id exists.\n");

    run_twig_command(dir, &["branch", "other"]).assert().success();
    run_twig_command(dir, &["checkout", "other"]).assert().success();
    commit_file(dir, "b.txt", "b\n", "add b");
    let with_b = get_head_commit_sha(dir)?;
    run_twig_command(dir, &["checkout", "master"]).assert().success();

    write_file(FileSpec::new(dir.join("b.txt"), "untracked\n".to_string()));
    run_twig_command(dir, &["reset", &with_b])
        .assert()
        .success()
        .stdout("There is an untracked file in the way; delete it, or add and commit it first.\n");
    assert_eq!(get_head_commit_sha(dir)?, head);

    delete_file(&dir.join("b.txt"));
    run_twig_command(dir, &["reset", &with_b]).assert().success();
    assert_eq!(read_file(dir, "b.txt"), "b\n");

    Ok(())
}

#[rstest]
fn untracked_directories_block_a_branch_switch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "other"]).assert().success();
    run_twig_command(dir, &["checkout", "other"]).assert().success();
    commit_file(dir, "notes", "tracked on other\n", "add notes");
    run_twig_command(dir, &["checkout", "master"]).assert().success();

    write_file(FileSpec::new(
        dir.join("notes/todo.txt"),
        "precious\n".to_string(),
    ));
    run_twig_command(dir, &["checkout", "other"])
        .assert()
        .success()
        .stdout("There is an untracked file in the way; delete it, or add and commit it first.\n");

    assert_eq!(read_file(dir, "notes/todo.txt"), "precious\n");
    assert_eq!(
        std::fs::read_to_string(dir.join(".twig/HEAD"))?.trim(),
        "ref: refs/heads/master"
    );

    Ok(())
}

#[rstest]
fn untracked_files_where_a_directory_belongs_block_a_branch_switch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["branch", "other"]).assert().success();
    run_twig_command(dir, &["checkout", "other"]).assert().success();
    run_twig_command(dir, &["rm", "a.txt"]).assert().success();
    commit_file(dir, "dir/x.txt", "x\n", "nest x, drop a");
    run_twig_command(dir, &["checkout", "master"]).assert().success();

    write_file(FileSpec::new(dir.join("dir"), "mine\n".to_string()));
    run_twig_command(dir, &["checkout", "other"])
        .assert()
        .success()
        .stdout("There is an untracked file in the way; delete it, or add and commit it first.\n");

    // nothing was touched before the switch was refused
    assert_eq!(read_file(dir, "a.txt"), "hi\n");
    assert_eq!(read_file(dir, "dir"), "mine\n");
    assert_eq!(
        std::fs::read_to_string(dir.join(".twig/HEAD"))?.trim(),
        "ref: refs/heads/master"
    );

    Ok(())
}

#[rstest]
fn untracked_directories_block_a_reset(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let first = get_head_commit_sha(dir)?;
    commit_file(dir, "notes", "tracked\n", "add notes");
    let with_notes = get_head_commit_sha(dir)?;
    run_twig_command(dir, &["reset", &first]).assert().success();
    assert!(!dir.join("notes").exists());

    write_file(FileSpec::new(
        dir.join("notes/todo.txt"),
        "precious\n".to_string(),
    ));
    run_twig_command(dir, &["reset", &with_notes])
        .assert()
        .success()
        .stdout("There is an untracked file in the way; delete it, or add and commit it first.\n");

    assert_eq!(read_file(dir, "notes/todo.txt"), "precious\n");
    assert_eq!(get_head_commit_sha(dir)?, first);

    Ok(())
}
