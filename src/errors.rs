//! User-facing failures
//!
//! Every error a user can trigger through a command is a [`TwigError`]. Each
//! variant's display text is the exact message printed to standard output.
//! Internal failures (I/O, corrupt objects) travel as plain `anyhow` errors.

use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

/// Broad category of a [`TwigError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed argument
    Validation,
    /// Unknown commit, branch, object or file-in-commit
    NotFound,
    /// Repository state forbids the operation
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TwigError {
    #[error("Please enter a commit message.")]
    MissingCommitMessage,
    #[error("Invalid branch name: {0}.")]
    InvalidBranchName(String),
    #[error("Incorrect operands.")]
    IncorrectOperands,

    #[error("File does not exist.")]
    FileNotFound,
    #[error("No commit with that id exists.")]
    CommitNotFound,
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("A branch with that name does not exist.")]
    BranchNotFound,
    #[error("No such branch exists.")]
    CheckoutBranchNotFound,
    #[error("At least one branch does not exist.")]
    DiffBranchesNotFound,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage,
    #[error("Object {0} is not in the store.")]
    ObjectNotFound(ObjectId),
    #[error("Root commit {0} has no parent.")]
    NoParent(ObjectId),

    #[error("Not in an initialized twig directory.")]
    NotInitialized,
    #[error("A twig version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("No reason to remove the file.")]
    NothingToRemove,
    #[error("A branch with that name already exists.")]
    BranchExists,
    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,
    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,
    #[error("Cannot merge a branch with itself.")]
    SelfMerge,
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay,
}

impl TwigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TwigError::MissingCommitMessage
            | TwigError::InvalidBranchName(_)
            | TwigError::IncorrectOperands => ErrorKind::Validation,
            TwigError::FileNotFound
            | TwigError::CommitNotFound
            | TwigError::FileNotInCommit
            | TwigError::BranchNotFound
            | TwigError::CheckoutBranchNotFound
            | TwigError::DiffBranchesNotFound
            | TwigError::NoCommitWithMessage
            | TwigError::ObjectNotFound(_)
            | TwigError::NoParent(_) => ErrorKind::NotFound,
            TwigError::NotInitialized
            | TwigError::AlreadyInitialized
            | TwigError::NothingToCommit
            | TwigError::NothingToRemove
            | TwigError::BranchExists
            | TwigError::RemoveCurrentBranch
            | TwigError::CheckoutCurrentBranch
            | TwigError::SelfMerge
            | TwigError::UncommittedChanges
            | TwigError::UntrackedFileInTheWay => ErrorKind::State,
        }
    }
}

/// Find the [`TwigError`] carried by an `anyhow` error chain, if any
pub fn find_twig_error(error: &anyhow::Error) -> Option<&TwigError> {
    error.chain().find_map(|cause| cause.downcast_ref::<TwigError>())
}
