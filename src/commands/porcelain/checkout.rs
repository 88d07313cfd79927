use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::errors::BitletError;
use std::path::{Path, PathBuf};

impl Repository {
    /// Switch to another branch
    ///
    /// The working tree is migrated from the current commit's snapshot to the branch
    /// tip's snapshot. Nothing is touched when an untracked file is in the way.
    pub async fn checkout_branch(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(name.to_string())
            .map_err(|_| BitletError::NoSuchBranch(name.to_string()))?;
        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(|| BitletError::NoSuchBranch(name.to_string()))?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(BitletError::NoOpCheckout(name.to_string()).into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, current) = self.head_commit()?;
        let target = self.database().load_commit(&target_oid)?;

        Migration::between(self, current.tree(), target.tree()).apply_changes()?;

        self.refs().set_head(&branch_name)?;
        tracing::info!(branch = %branch_name, "switched branch");

        index.clear();
        index.write_updates()?;

        Ok(())
    }

    /// Restore one file from a commit (the current one when `revision` is `None`)
    ///
    /// The index is left untouched.
    pub async fn checkout_file(&mut self, revision: Option<&str>, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let (_, commit) = match revision {
            Some(revision) => self.resolve_commit(revision)?,
            None => self.head_commit()?,
        };

        let path = self
            .workspace()
            .normalize(Path::new(file))
            .ok_or_else(|| BitletError::FileNotFound(PathBuf::from(file)))?;
        let blob_oid = commit
            .blob_for(&path)
            .ok_or_else(|| BitletError::FileNotInCommit(PathBuf::from(file)))?;

        let data = self.database().load_blob_data(blob_oid)?;
        self.workspace().write_file(&path, &data)?;

        Ok(())
    }
}
