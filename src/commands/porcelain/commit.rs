use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use std::io::Write;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        if message.trim().is_empty() {
            return Err(BitletError::EmptyCommitMessage.into());
        }

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        if index.is_empty() {
            return Err(BitletError::NothingToCommit.into());
        }

        let (parent, _) = self.head_commit()?;
        let (commit_id, commit) = self.write_commit(&index, vec![parent], message.to_string())?;

        index.clear();
        index.write_updates()?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            self.refs().current_branch()?,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_id)
    }
}
