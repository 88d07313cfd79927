use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::BitletError;

impl Repository {
    /// Create a branch pointing at the current commit, without switching to it
    pub async fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(name.to_string())?;
        let (head_oid, _) = self.head_commit()?;

        self.refs().create_branch(&branch_name, head_oid)?;

        Ok(())
    }

    /// Delete a branch pointer; its commits stay in the store
    pub async fn rm_branch(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(name.to_string())
            .map_err(|_| BitletError::NoSuchBranch(name.to_string()))?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(BitletError::CannotDeleteCurrentBranch(name.to_string()).into());
        }

        self.refs().delete_branch(&branch_name)?;

        Ok(())
    }
}
