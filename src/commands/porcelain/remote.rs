use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::log::rev_list::reachable;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::remote::transfer::Transfer;
use crate::errors::BitletError;

impl Repository {
    pub async fn add_remote(&mut self, name: &str, location: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        self.remotes().add(name, location)
    }

    pub async fn rm_remote(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        self.remotes().remove(name)
    }

    /// Copy a remote branch's history and point `<remote>/<branch>` at its tip
    pub async fn fetch(&mut self, remote: &str, branch: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let remote_repository = self.open_remote(remote)?;
        let remote_branch = BranchName::try_parse(branch.to_string())
            .map_err(|_| BitletError::RemoteBranchNotFound(branch.to_string()))?;
        let remote_tip = remote_repository
            .refs()
            .read_branch(&remote_branch)?
            .ok_or_else(|| BitletError::RemoteBranchNotFound(branch.to_string()))?;

        Transfer::new(remote_repository.database(), self.database()).copy_reachable(&remote_tip)?;

        let tracking_branch = BranchName::remote_tracking(remote, &remote_branch)?;
        self.refs()
            .update_branch(&tracking_branch, remote_tip.clone())?;
        tracing::info!(
            branch = %tracking_branch,
            tip = %remote_tip.to_short_oid(),
            "remote branch fetched"
        );

        Ok(remote_tip)
    }

    /// Send the current branch to a remote branch, fast-forward only
    pub async fn push(&mut self, remote: &str, branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let remote_repository = self.open_remote(remote)?;
        let remote_branch = BranchName::try_parse(branch.to_string())?;
        let (local_tip, _) = self.head_commit()?;

        if let Some(remote_tip) = remote_repository.refs().read_branch(&remote_branch)?
            && !reachable(self.database(), &local_tip)?.contains(&remote_tip)
        {
            return Err(BitletError::RejectedNonFastForward.into());
        }

        Transfer::new(self.database(), remote_repository.database()).copy_reachable(&local_tip)?;
        remote_repository
            .refs()
            .update_branch(&remote_branch, local_tip.clone())?;
        tracing::info!(
            remote,
            branch = %remote_branch,
            tip = %local_tip.to_short_oid(),
            "branch pushed"
        );

        Ok(())
    }

    /// Fetch a remote branch, then merge `<remote>/<branch>` into the current branch
    pub async fn pull(&mut self, remote: &str, branch: &str) -> anyhow::Result<MergeOutcome> {
        self.fetch(remote, branch).await?;

        let remote_branch = BranchName::try_parse(branch.to_string())?;
        let tracking_branch = BranchName::remote_tracking(remote, &remote_branch)?;

        self.merge(tracking_branch.as_ref()).await
    }

    fn open_remote(&self, name: &str) -> anyhow::Result<Repository> {
        let metadata_dir = self.remotes().metadata_dir(name, self.path())?;

        Repository::open_metadata_dir(&metadata_dir)
    }
}
