//! Porcelain commands
//!
//! - `init`: Create the metadata directory and the initial commit
//! - `add` / `rm`: Stage additions and removals
//! - `commit`: Record the staged changes
//! - `log`: First-parent history, every commit, and lookup by message
//! - `status`: Branches, staged changes and working-tree changes
//! - `checkout`: Switch branches or restore single files
//! - `branch`: Create and delete branches
//! - `reset`: Move the current branch to another commit
//! - `merge`: Three-way merge of another branch
//! - `remote`: Remote registry, fetch, push and pull

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod remote;
pub mod reset;
pub mod rm;
pub mod status;
