use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use std::process::ExitCode;
use twig::areas::repository::Repository;
use twig::artifacts::core::pager::{PagerWriter, should_page};
use twig::commands::porcelain::checkout::CheckoutTarget;
use twig::config::RepositoryConfig;
use twig::errors::find_twig_error;

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    about = "A small content-addressed version-control system",
    long_about = "twig snapshots a working directory into content-addressed objects, \
    links the snapshots into a commit graph and supports branching, \
    three-way merging and line diffs.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates .twig in the current directory with an initial commit \
        on the master branch."
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged changes")]
    Commit {
        #[arg(index = 1, default_value = "", help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or stage its removal if it is tracked"
    )]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "checkout -- <file> restores a file from the current commit, \
        checkout <commit> -- <file> restores it from another commit, \
        checkout <branch> switches to a branch."
    )]
    Checkout {
        #[arg(help = "Commit id or branch name")]
        target: Option<String>,
        #[arg(last = true, help = "File to restore")]
        file: Option<String>,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(
        name = "diff",
        about = "Show line differences",
        long_about = "With no branch the current branch is compared with the working tree, \
        with one branch that branch is, with two branches they are compared with each other."
    )]
    Diff {
        #[arg(num_args = 0..=2)]
        branches: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    twig::telemetry::init();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match find_twig_error(&error) {
            Some(twig_error) => {
                println!("{twig_error}");
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("Error: {error:?}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(command: Commands) -> Result<()> {
    let config = RepositoryConfig::load_from_env()?;
    let pwd = std::env::current_dir()?;
    let pwd = pwd.to_string_lossy();

    let paged = matches!(command, Commands::Log | Commands::GlobalLog) && should_page(&config);
    let pager = Pager::new();
    let writer: Box<dyn std::io::Write> = if paged {
        Box::new(PagerWriter::new(pager.clone()))
    } else {
        Box::new(std::io::stdout())
    };

    let mut repository = Repository::new(&pwd, writer, config)?;
    if !matches!(command, Commands::Init) {
        repository.ensure_initialized()?;
    }

    match command {
        Commands::Init => repository.init().await?,
        Commands::Add { file } => repository.add(&file).await?,
        Commands::Commit { message } => {
            repository.commit(&message).await?;
        }
        Commands::Rm { file } => repository.rm(&file).await?,
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => repository.find(&message)?,
        Commands::Status => repository.status().await?,
        Commands::Branch { name } => repository.branch(&name)?,
        Commands::RmBranch { name } => repository.rm_branch(&name)?,
        Commands::Checkout { target, file } => {
            let target = CheckoutTarget::from_operands(target, file)?;
            repository.checkout(target).await?
        }
        Commands::Reset { commit } => repository.reset(&commit).await?,
        Commands::Merge { branch } => {
            repository.merge(&branch).await?;
        }
        Commands::Diff { branches } => repository.diff(&branches)?,
    }
    repository.writer().flush()?;

    if paged {
        minus::page_all(pager)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn command_definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case::head_file(&["twig", "checkout", "--", "a.txt"], None, Some("a.txt"))]
    #[case::commit_file(
        &["twig", "checkout", "1a2b3c", "--", "a.txt"],
        Some("1a2b3c"),
        Some("a.txt")
    )]
    #[case::branch(&["twig", "checkout", "feature"], Some("feature"), None)]
    fn checkout_operands_split_on_double_dash(
        #[case] args: &[&str],
        #[case] expected_target: Option<&str>,
        #[case] expected_file: Option<&str>,
    ) {
        let cli = Cli::try_parse_from(args).unwrap();
        let Commands::Checkout { target, file } = cli.command else {
            panic!("expected a checkout command");
        };

        assert_eq!(target.as_deref(), expected_target);
        assert_eq!(file.as_deref(), expected_file);
    }
}
