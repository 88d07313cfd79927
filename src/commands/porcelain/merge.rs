use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::resolution::{PathResolution, conflict_content};
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::merge::{MergeOutcome, MergePlan};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::TreeSnapshot;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use bytes::Bytes;
use std::io::Write;

impl Repository {
    /// Merge the given branch into the current one
    ///
    /// Every check (branch, self-merge, staged changes, untracked files in the way) runs
    /// before the working tree is touched.
    pub async fn merge(&mut self, name: &str) -> anyhow::Result<MergeOutcome> {
        self.ensure_initialized()?;

        let given_branch = BranchName::try_parse(name.to_string())
            .map_err(|_| BitletError::NoSuchBranch(name.to_string()))?;
        let given_oid = self
            .refs()
            .read_branch(&given_branch)?
            .ok_or_else(|| BitletError::NoSuchBranch(name.to_string()))?;

        let current_branch = self.refs().current_branch()?;
        if given_branch == current_branch {
            return Err(BitletError::MergeSelf(name.to_string()).into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if !index.is_empty() {
            return Err(BitletError::UncommittedChanges.into());
        }

        let (current_oid, current) = self.head_commit()?;
        let database = self.database();

        let split_oid = SplitPointFinder::new(
            |oid: &ObjectId| -> anyhow::Result<Vec<ObjectId>> {
                Ok(database.load_commit(oid)?.parents().to_vec())
            },
        )
        .find_split_point(&current_oid, &given_oid)?;

        if split_oid.as_ref() == Some(&given_oid) {
            writeln!(
                self.writer(),
                "Given branch is an ancestor of the current branch."
            )?;
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        let given = database.load_commit(&given_oid)?;

        if split_oid.as_ref() == Some(&current_oid) {
            Migration::between(self, current.tree(), given.tree()).apply_changes()?;
            self.refs().update_head(given_oid)?;

            index.clear();
            index.write_updates()?;

            writeln!(self.writer(), "Current branch fast-forwarded.")?;
            return Ok(MergeOutcome::FastForward);
        }

        let split_tree = match &split_oid {
            Some(split_oid) => database.load_commit(split_oid)?.tree().clone(),
            None => TreeSnapshot::new(),
        };
        let plan = MergePlan::compute(&split_tree, current.tree(), given.tree());
        tracing::debug!(
            split_point = ?split_oid.as_ref().map(|oid| oid.to_short_oid()),
            changes = plan.resolutions().len(),
            conflict = plan.has_conflicts(),
            "merge planned"
        );

        let mut migration = Migration::new(self, current.tree());
        let mut conflict_blobs = Vec::new();

        for (path, resolution) in plan.resolutions() {
            match resolution {
                PathResolution::Keep => {}
                PathResolution::Take(oid) => migration.write(path, oid.clone()),
                PathResolution::Delete => migration.delete(path),
                PathResolution::Conflict { current, given } => {
                    let current = current
                        .as_ref()
                        .map(|oid| database.load_blob_data(oid))
                        .transpose()?;
                    let given = given
                        .as_ref()
                        .map(|oid| database.load_blob_data(oid))
                        .transpose()?;

                    let blob = Blob::new(Bytes::from(conflict_content(
                        current.as_deref(),
                        given.as_deref(),
                    )));
                    migration.write(path, blob.object_id()?);
                    conflict_blobs.push(blob);
                }
            }
        }

        migration.check_for_conflicts()?;

        for blob in &conflict_blobs {
            database.store(blob)?;
        }
        self.workspace().apply_migration(&migration)?;

        for (path, oid) in migration.writes() {
            index.add(path, oid.clone());
        }
        for path in migration.deletes() {
            index.mark_removed(path);
        }

        let message = format!("Merged {} into {}.", given_branch, current_branch);
        self.write_commit(&index, vec![current_oid, given_oid], message)?;

        index.clear();
        index.write_updates()?;

        let conflict = plan.has_conflicts();
        if conflict {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(MergeOutcome::Merged { conflict })
    }
}
