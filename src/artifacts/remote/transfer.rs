use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub commits: usize,
    pub blobs: usize,
}

/// Copies history from one object store into another
#[derive(Debug, new)]
pub struct Transfer<'d> {
    source: &'d Database,
    target: &'d Database,
}

impl Transfer<'_> {
    /// Copy every commit reachable from `tip`, and the blobs they track, into the target
    ///
    /// Commits are written oldest first and each one after its blobs. A commit present in
    /// the target therefore implies its whole history is present too, which is what lets
    /// the walk stop at the first commit the target already has.
    pub fn copy_reachable(&self, tip: &ObjectId) -> anyhow::Result<TransferStats> {
        let missing_commits = self.missing_commits(tip)?;
        let mut stats = TransferStats::default();

        for commit_oid in &missing_commits {
            let commit = self.source.load_commit(commit_oid)?;

            for blob_oid in commit.tree().values() {
                if self.source.copy_object_to(self.target, blob_oid)? {
                    stats.blobs += 1;
                }
            }
            if self.source.copy_object_to(self.target, commit_oid)? {
                stats.commits += 1;
            }
        }

        tracing::debug!(
            tip = %tip.to_short_oid(),
            commits = stats.commits,
            blobs = stats.blobs,
            "objects transferred"
        );

        Ok(stats)
    }

    /// Commits reachable from `tip` the target lacks, every parent before its children
    fn missing_commits(&self, tip: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        let mut seen = HashSet::new();
        let mut missing = Vec::new();
        let mut stack = vec![(tip.clone(), false)];

        while let Some((oid, parents_done)) = stack.pop() {
            if parents_done {
                missing.push(oid);
                continue;
            }
            if !seen.insert(oid.clone()) || self.target.exists(&oid) {
                continue;
            }

            let commit = self.source.load_commit(&oid)?;
            stack.push((oid, true));
            stack.extend(commit.parents().iter().map(|parent| (parent.clone(), false)));
        }

        Ok(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::commit::{Commit, TreeSnapshot};
    use assert_fs::TempDir;
    use bytes::Bytes;
    use chrono::DateTime;

    fn database_in(dir: &TempDir, name: &str) -> Database {
        Database::new(dir.path().join(name).into_boxed_path())
    }

    #[test]
    fn copies_history_once() {
        let dir = TempDir::new().unwrap();
        let source = database_in(&dir, "source");
        let target = database_in(&dir, "target");

        let root = source.store(&Commit::initial()).unwrap();
        let blob = source.store(&Blob::new(Bytes::from_static(b"hello"))).unwrap();
        let tip = source
            .store(&Commit::new(
                vec![root.clone()],
                TreeSnapshot::from([("f.txt".to_string(), blob.clone())]),
                DateTime::parse_from_rfc2822("Sat, 1 Jan 2022 00:00:00 +0000").unwrap(),
                "add f".to_string(),
            ))
            .unwrap();
        target.store(&Commit::initial()).unwrap();

        let transfer = Transfer::new(&source, &target);
        let first = transfer.copy_reachable(&tip).unwrap();
        let second = transfer.copy_reachable(&tip).unwrap();

        assert_eq!(first, TransferStats { commits: 1, blobs: 1 });
        assert_eq!(second, TransferStats::default());
        assert!(target.exists(&tip) && target.exists(&blob) && target.exists(&root));
    }
}
