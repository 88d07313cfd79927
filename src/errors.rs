//! Domain errors
//!
//! Every expected failure of a repository operation is a [`BitletError`]. Operations
//! return `anyhow::Result` like the rest of the crate; the command layer downcasts to
//! `BitletError` to print the user-facing message and pick the exit status.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

/// Coarse error categories used to decide how a failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed invocation; the only kind that ends with a non-zero exit status
    Usage,
    /// A missing object, commit, branch or file
    NotFound,
    /// The repository is not in a state that allows the operation
    PreconditionFailed,
    /// An untracked working file would be overwritten or removed
    WorkingTreeConflict,
    /// The remote location, branch or fast-forward check failed
    Remote,
}

#[derive(Debug, thiserror::Error)]
pub enum BitletError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,
    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("File does not exist.")]
    FileNotFound(PathBuf),
    #[error("No reason to remove the file.")]
    NothingToRemove(PathBuf),
    #[error("Please enter a commit message.")]
    EmptyCommitMessage,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),
    #[error("A branch with that name already exists.")]
    BranchExists(String),
    #[error("A branch with that name does not exist.")]
    NoSuchBranch(String),
    #[error("Cannot remove the current branch.")]
    CannotDeleteCurrentBranch(String),
    #[error("No need to checkout the current branch.")]
    NoOpCheckout(String),
    #[error("No commit with that id exists.")]
    NoSuchCommit(String),
    #[error("Commit id {0} is ambiguous.")]
    AmbiguousCommitId(String),
    #[error("File does not exist in that commit.")]
    FileNotInCommit(PathBuf),
    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),
    #[error("Object {0} not found.")]
    ObjectNotFound(ObjectId),
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict(Vec<PathBuf>),
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    MergeSelf(String),
    #[error("A remote with that name already exists.")]
    RemoteExists(String),
    #[error("A remote with that name does not exist.")]
    NoSuchRemote(String),
    #[error("Remote directory not found.")]
    RemoteDirNotFound(PathBuf),
    #[error("That remote does not have that branch.")]
    RemoteBranchNotFound(String),
    #[error("Please pull down remote changes before pushing.")]
    RejectedNonFastForward,
}

impl BitletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BitletError::IncorrectOperands | BitletError::InvalidBranchName(_) => ErrorKind::Usage,
            BitletError::FileNotFound(_)
            | BitletError::NoSuchBranch(_)
            | BitletError::NoSuchCommit(_)
            | BitletError::AmbiguousCommitId(_)
            | BitletError::FileNotInCommit(_)
            | BitletError::NoCommitWithMessage(_)
            | BitletError::ObjectNotFound(_) => ErrorKind::NotFound,
            BitletError::NotInitialized
            | BitletError::AlreadyInitialized
            | BitletError::NothingToRemove(_)
            | BitletError::EmptyCommitMessage
            | BitletError::NothingToCommit
            | BitletError::BranchExists(_)
            | BitletError::CannotDeleteCurrentBranch(_)
            | BitletError::NoOpCheckout(_)
            | BitletError::UncommittedChanges
            | BitletError::MergeSelf(_)
            | BitletError::RemoteExists(_) => ErrorKind::PreconditionFailed,
            BitletError::UntrackedFileConflict(_) => ErrorKind::WorkingTreeConflict,
            BitletError::NoSuchRemote(_)
            | BitletError::RemoteDirNotFound(_)
            | BitletError::RemoteBranchNotFound(_)
            | BitletError::RejectedNonFastForward => ErrorKind::Remote,
        }
    }

    /// Find the domain error behind an `anyhow` chain, if there is one
    pub fn find(error: &anyhow::Error) -> Option<&BitletError> {
        error.chain().find_map(|cause| cause.downcast_ref::<BitletError>())
    }
}
