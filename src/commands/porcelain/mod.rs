//! User-facing commands
//!
//! ## Commands
//!
//! - `init`: Create the repository with its root commit
//! - `add`, `rm`: Stage additions and removals
//! - `commit`: Record the staged changes
//! - `log`, `global-log`, `find`: Inspect history
//! - `status`: Show branches, stages and working tree changes
//! - `branch`, `rm-branch`: Create or delete branches
//! - `checkout`: Restore files or switch branches
//! - `reset`: Move the current branch to another commit
//! - `merge`: Three-way merge of another branch
//! - `diff`: Line diff between branches and the working tree

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
