//! Commit object
//!
//! A commit is an immutable snapshot of the repository. Unlike git there is no separate
//! tree object: each commit owns the complete path → blob mapping of its snapshot.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>            (zero, one or two lines)
//! timestamp <unix-seconds> <+hhmm>
//! file <blob-sha> <path>         (one line per tracked path, sorted)
//!
//! <commit message>
//! ```
//!
//! The commit ID hashes all of it, so parents, timestamp, message and snapshot are
//! covered by the key.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Message of the root commit created by `init`
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable pinning the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "BITLET_COMMIT_DATE";

/// Repository-relative path (forward slashes) → blob ID
pub type TreeSnapshot = BTreeMap<String, ObjectId>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for the root commit, two for merge commits)
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    tree: TreeSnapshot,
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        tree: TreeSnapshot,
        timestamp: DateTime<FixedOffset>,
        message: String,
    ) -> Self {
        Commit {
            parents,
            timestamp,
            tree,
            message,
        }
    }

    /// The parentless root commit every repository starts from
    ///
    /// Its timestamp is the Unix epoch, so the root commit has the same ID everywhere.
    pub fn initial() -> Self {
        Commit::new(
            Vec::new(),
            TreeSnapshot::new(),
            DateTime::<Utc>::UNIX_EPOCH.fixed_offset(),
            INITIAL_COMMIT_MESSAGE.to_string(),
        )
    }

    /// Timestamp for a new commit
    ///
    /// Reads `BITLET_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and falls back
    /// to the current local time.
    pub fn timestamp_from_env() -> DateTime<FixedOffset> {
        std::env::var(COMMIT_DATE_ENV)
            .ok()
            .and_then(|date_str| {
                DateTime::parse_from_rfc2822(&date_str)
                    .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                    .ok()
            })
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn tree(&self) -> &TreeSnapshot {
        &self.tree
    }

    pub fn blob_for(&self, path: &str) -> Option<&ObjectId> {
        self.tree.get(path)
    }

    pub fn tracks(&self, path: &str) -> bool {
        self.tree.contains_key(path)
    }

    /// Timestamp in the form "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    fn body(&self) -> String {
        let mut lines = vec![];

        for parent in &self.parents {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (path, oid) in &self.tree {
            lines.push(format!("file {} {}", oid.as_ref(), path));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content_bytes = self.body().into_bytes();

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let mut lines = content.split('\n');
        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing timestamp line")?;

        let mut parents = Vec::new();
        while let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent_oid.to_string())?);
            next_line = lines
                .next()
                .context("Invalid commit object: missing timestamp line")?;
        }

        let timestamp = next_line
            .strip_prefix("timestamp ")
            .context("Invalid commit object: invalid timestamp line")?;
        let timestamp = DateTime::parse_from_str(timestamp, "%s %z")
            .with_context(|| format!("Invalid commit object: bad timestamp {timestamp}"))?;

        let mut tree = TreeSnapshot::new();
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }

            let (oid, path) = line
                .strip_prefix("file ")
                .and_then(|entry| entry.split_once(' '))
                .context("Invalid commit object: invalid file line")?;
            tree.insert(path.to_string(), ObjectId::try_parse(oid.to_string())?);
        }

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(parents, tree, timestamp, message))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.body()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    #[fixture]
    fn merge_commit() -> Commit {
        let timestamp = DateTime::parse_from_str("2023-01-01 12:00:00 +0200", "%Y-%m-%d %H:%M:%S %z")
            .unwrap();
        let tree = TreeSnapshot::from([
            ("f.txt".to_string(), ObjectId::hash_of(b"blob 5\0hello")),
            ("dir/with space.txt".to_string(), ObjectId::hash_of(b"blob 0\0")),
        ]);

        Commit::new(
            vec![ObjectId::hash_of(b"first"), ObjectId::hash_of(b"second")],
            tree,
            timestamp,
            "Merged b2 into master.\n\nsecond paragraph".to_string(),
        )
    }

    #[rstest]
    fn deserializing_restores_every_field(merge_commit: Commit) {
        let serialized = merge_commit.serialize().unwrap();
        let mut reader = Cursor::new(serialized);
        assert_eq!(
            ObjectType::parse_object_type(&mut reader).unwrap(),
            ObjectType::Commit
        );

        let parsed = Commit::deserialize(reader).unwrap();

        assert_eq!(parsed, merge_commit);
        assert!(parsed.is_merge());
        assert_eq!(parsed.short_message(), "Merged b2 into master.");
    }

    #[rstest]
    fn key_covers_the_message(merge_commit: Commit) {
        let mut amended = merge_commit.clone();
        amended.message = "another message".to_string();

        assert_ne!(
            merge_commit.object_id().unwrap(),
            amended.object_id().unwrap()
        );
    }

    #[test]
    fn initial_commit_has_a_stable_key() {
        let first = Commit::initial();
        let second = Commit::initial();

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        assert!(first.parents().is_empty());
        assert_eq!(first.readable_timestamp(), "Thu Jan 1 00:00:00 1970 +0000");
    }
}
