//! Staging index
//!
//! The index records the pending changes of the next commit relative to the current one:
//!
//! - `additions`: path → blob ID of the staged content
//! - `removals`: paths staged for removal
//!
//! A path is never in both at once. The index is persisted between invocations and
//! cleared after every commit, branch checkout, reset and fast-forward.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{StagedAddition, StagedRemoval};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.gitlet/index`)
    path: Box<Path>,
    additions: BTreeMap<String, ObjectId>,
    removals: BTreeSet<String>,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk
    ///
    /// A missing or empty index file is an empty index.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path().exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        // if the index file is empty, return early
        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let header = Self::parse_header(&mut reader)?;

        for _ in 0..header.additions_count {
            let entry = StagedAddition::read_from(&mut reader)?;
            self.additions.insert(entry.path, entry.oid);
        }
        for _ in 0..header.removals_count {
            let entry = StagedRemoval::read_from(&mut reader)?;
            self.removals.insert(entry.path);
        }

        reader.verify()
    }

    fn parse_header(reader: &mut Checksum) -> anyhow::Result<IndexHeader> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(std::io::Cursor::new(header_bytes))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported index file version: {}",
                header.version
            ));
        }

        Ok(header)
    }

    /// Persist the index if anything changed since it was loaded
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        let header = IndexHeader::new(
            String::from(SIGNATURE),
            VERSION,
            self.additions.len() as u32,
            self.removals.len() as u32,
        );
        writer.write(&header.serialize()?)?;

        for (path, oid) in &self.additions {
            let entry = StagedAddition::new(path.clone(), oid.clone());
            writer.write(&entry.serialize()?)?;
        }
        for path in &self.removals {
            writer.write(&StagedRemoval::new(path.clone()).serialize()?)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }

    /// Stage new content for a path, replacing any earlier staged version
    pub fn add(&mut self, path: &str, oid: ObjectId) {
        self.removals.remove(path);
        self.additions.insert(path.to_string(), oid);
        self.changed = true;
    }

    /// Drop a staged addition, returning whether there was one
    pub fn unstage(&mut self, path: &str) -> bool {
        let removed = self.additions.remove(path).is_some();
        self.changed |= removed;
        removed
    }

    /// Stage a tracked path for removal
    pub fn mark_removed(&mut self, path: &str) {
        self.additions.remove(path);
        self.removals.insert(path.to_string());
        self.changed = true;
    }

    /// Cancel a pending removal, returning whether there was one
    pub fn unmark_removed(&mut self, path: &str) -> bool {
        let removed = self.removals.remove(path);
        self.changed |= removed;
        removed
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.changed = true;
        }
        self.additions.clear();
        self.removals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn additions(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }

    pub fn staged_oid(&self, path: &str) -> Option<&ObjectId> {
        self.additions.get(path)
    }

    pub fn is_removed(&self, path: &str) -> bool {
        self.removals.contains(path)
    }
}
