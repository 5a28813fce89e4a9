use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Initialized repository whose master branch has one commit tracking
/// `a.txt` with content `hi\n`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "hi\n".to_string(),
    ));
    run_twig_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    twig_commit(repository_dir.path(), "first")
        .assert()
        .success();

    repository_dir
}

/// State after the branching walkthrough: `feat` changed `a.txt` to
/// `bye\n` in commit "second" and master is checked out again
#[fixture]
pub fn diverged_repository_dir(init_repository_dir: TempDir) -> TempDir {
    let dir = init_repository_dir.path();

    run_twig_command(dir, &["branch", "feat"]).assert().success();
    run_twig_command(dir, &["checkout", "feat"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("a.txt"), "bye\n".to_string()));
    run_twig_command(dir, &["add", "a.txt"]).assert().success();
    twig_commit(dir, "second").assert().success();
    run_twig_command(dir, &["checkout", "master"])
        .assert()
        .success();

    init_repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.env_remove("TWIG_LOG");
    cmd.env_remove("TWIG_SPLIT_POINT");
    cmd.env_remove("TWIG_COMMIT_CLOCK");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_command(dir, &["commit", message])
}

/// Stage and commit `name` with `content`
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    run_twig_command(dir, &["add", name]).assert().success();
    twig_commit(dir, message).assert().success();
}

/// Commit the current branch points to
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".twig").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    let ref_path = head_content
        .strip_prefix("ref: ")
        .ok_or("HEAD is not a symbolic ref")?;
    let commit_sha = std::fs::read_to_string(dir.join(".twig").join(ref_path.trim()))?;

    Ok(commit_sha.trim().to_string())
}

pub fn get_branch_commit_sha(
    dir: &Path,
    branch: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let branch_path = dir.join(".twig").join("refs").join("heads").join(branch);
    Ok(std::fs::read_to_string(branch_path)?.trim().to_string())
}

/// stdout of a successful command
pub fn twig_output(dir: &Path, args: &[&str]) -> String {
    let output = run_twig_command(dir, args)
        .output()
        .expect("Failed to run twig");
    assert!(output.status.success(), "twig {args:?} failed: {output:?}");

    String::from_utf8(output.stdout).expect("twig printed invalid UTF-8")
}
