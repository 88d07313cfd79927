use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::{BTreeSet, VecDeque};

/// First-parent history, from a commit back to the root
#[derive(Clone, new)]
pub struct RevList<'r> {
    database: &'r Database,
    start_oid: ObjectId,
}

impl<'r> IntoIterator for RevList<'r> {
    type Item = anyhow::Result<(ObjectId, Commit)>;
    type IntoIter = RevListIntoIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        RevListIntoIter {
            database: self.database,
            current_commit_oid: Some(self.start_oid),
        }
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'r> {
    database: &'r Database,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.database.load_commit(&commit_oid) {
            Ok(commit) => {
                // Move to the parent commit for the next iteration
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

/// Every commit reachable from `start` through all parents, `start` included
pub fn reachable(database: &Database, start: &ObjectId) -> anyhow::Result<BTreeSet<ObjectId>> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(oid) = queue.pop_front() {
        if !seen.insert(oid.clone()) {
            continue;
        }

        let commit = database.load_commit(&oid)?;
        queue.extend(commit.parents().iter().cloned());
    }

    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::TreeSnapshot;
    use assert_fs::TempDir;
    use chrono::DateTime;
    use rstest::{fixture, rstest};

    struct History {
        _dir: TempDir,
        database: Database,
        root: ObjectId,
        left: ObjectId,
        right: ObjectId,
        merge: ObjectId,
    }

    fn commit(database: &Database, parents: Vec<ObjectId>, message: &str) -> ObjectId {
        let timestamp = DateTime::parse_from_rfc2822("Sat, 1 Jan 2022 00:00:00 +0000").unwrap();
        database
            .store(&Commit::new(parents, TreeSnapshot::new(), timestamp, message.to_string()))
            .unwrap()
    }

    // root <- left <- merge
    //     \          /
    //      <- right <
    #[fixture]
    fn history() -> History {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        let root = database.store(&Commit::initial()).unwrap();
        let left = commit(&database, vec![root.clone()], "left");
        let right = commit(&database, vec![root.clone()], "right");
        let merge = commit(&database, vec![left.clone(), right.clone()], "merge");

        History { _dir: dir, database, root, left, right, merge }
    }

    #[rstest]
    fn rev_list_follows_first_parents(history: History) {
        let oids = RevList::new(&history.database, history.merge.clone())
            .into_iter()
            .map(|entry| entry.map(|(oid, _)| oid))
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(oids, vec![history.merge, history.left, history.root]);
    }

    #[rstest]
    fn reachable_follows_every_parent(history: History) {
        let all = reachable(&history.database, &history.merge).unwrap();

        assert_eq!(all.len(), 4);
        assert!(all.contains(&history.right));
        assert_eq!(
            reachable(&history.database, &history.right).unwrap(),
            BTreeSet::from([history.root.clone(), history.right.clone()])
        );
    }
}
