use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Record the staged changes on top of the current tip and advance the current branch
    ///
    /// The snapshot is the tip's snapshot with the index's additions overlaid and its
    /// removals dropped. Callers own the index lock and clear the index afterwards.
    pub(crate) fn write_commit(
        &self,
        index: &Index,
        parents: Vec<ObjectId>,
        message: String,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        let (_, head) = self.head_commit()?;

        let mut tree = head.tree().clone();
        for (path, oid) in index.additions() {
            tree.insert(path.clone(), oid.clone());
        }
        for path in index.removals() {
            tree.remove(path);
        }

        let commit = Commit::new(parents, tree, Commit::timestamp_from_env(), message);
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(commit_id.clone())?;

        tracing::debug!(
            commit = %commit_id.to_short_oid(),
            parents = commit.parents().len(),
            files = commit.tree().len(),
            "commit written"
        );

        Ok((commit_id, commit))
    }
}
