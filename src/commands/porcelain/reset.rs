use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Move the current branch to an arbitrary commit and check out its snapshot
    pub async fn reset(&mut self, revision: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let (target_oid, target) = self.resolve_commit(revision)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, current) = self.head_commit()?;

        Migration::between(self, current.tree(), target.tree()).apply_changes()?;

        self.refs().update_head(target_oid.clone())?;

        index.clear();
        index.write_updates()?;

        Ok(target_oid)
    }
}
