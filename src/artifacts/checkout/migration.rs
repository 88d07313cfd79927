//! Working-tree migration planning and conflict detection
//!
//! A migration is a set of per-path actions relative to the snapshot of the current
//! commit: write a blob (`Add` for paths the current commit does not track, `Modify`
//! for paths it does) or `Delete` a file.
//!
//! ## Conflict Detection
//!
//! Files tracked by the current commit may be overwritten or removed freely; their
//! content is recoverable from the store. An untracked file is only safe when the
//! migration would leave it exactly as it is. Detected conflicts:
//! - Untracked overwrites: a write would change an untracked file (or replace an
//!   untracked file sitting where a parent directory must go)
//! - Untracked removals: a delete would remove an untracked file
//! - Untracked directories: a write would replace a directory holding untracked files

use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::ConflictType;
use crate::artifacts::objects::commit::TreeSnapshot;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Type of file system action required by a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create a file the current commit does not track
    Add,
    /// Delete a file
    Delete,
    /// Overwrite a tracked file
    Modify,
}

/// Planned actions grouped by type, each keyed by path (`None` for deletes)
pub type ActionsSet = HashMap<ActionType, BTreeMap<String, Option<ObjectId>>>;

/// Detected conflicts grouped by type
pub type ConflictsSet = BTreeMap<ConflictType, Vec<String>>;

pub struct Migration<'r> {
    repository: &'r Repository,
    /// Snapshot of the current commit
    current: &'r TreeSnapshot,
    actions: ActionsSet,
    conflicts: ConflictsSet,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, current: &'r TreeSnapshot) -> Self {
        let actions = HashMap::from([
            (ActionType::Add, BTreeMap::new()),
            (ActionType::Delete, BTreeMap::new()),
            (ActionType::Modify, BTreeMap::new()),
        ]);

        Self {
            repository,
            current,
            actions,
            conflicts: ConflictsSet::new(),
        }
    }

    /// Plan the move from the current snapshot to a target snapshot
    ///
    /// Every target path is written (restoring tracked files with local edits too) and
    /// every path tracked only by the current snapshot is deleted.
    pub fn between(
        repository: &'r Repository,
        current: &'r TreeSnapshot,
        target: &TreeSnapshot,
    ) -> Self {
        let mut migration = Self::new(repository, current);

        for (path, oid) in target {
            migration.write(path, oid.clone());
        }
        for path in current.keys().filter(|path| !target.contains_key(*path)) {
            migration.delete(path);
        }

        migration
    }

    pub fn write(&mut self, path: &str, oid: ObjectId) {
        let action = if self.current.contains_key(path) {
            ActionType::Modify
        } else {
            ActionType::Add
        };

        self.actions
            .entry(action)
            .or_default()
            .insert(path.to_string(), Some(oid));
    }

    pub fn delete(&mut self, path: &str) {
        self.actions
            .entry(ActionType::Delete)
            .or_default()
            .insert(path.to_string(), None);
    }

    pub fn actions_of(
        &self,
        action: &ActionType,
    ) -> impl Iterator<Item = (&String, Option<&ObjectId>)> {
        self.actions
            .get(action)
            .into_iter()
            .flat_map(|paths| paths.iter().map(|(path, oid)| (path, oid.as_ref())))
    }

    /// Paths and blob IDs of every planned write, sorted by path
    pub fn writes(&self) -> BTreeMap<&String, &ObjectId> {
        self.actions_of(&ActionType::Add)
            .chain(self.actions_of(&ActionType::Modify))
            .filter_map(|(path, oid)| Some((path, oid?)))
            .collect()
    }

    pub fn deletes(&self) -> impl Iterator<Item = &String> {
        self.actions_of(&ActionType::Delete).map(|(path, _)| path)
    }

    /// Check the plan, then carry it out on the working tree
    ///
    /// Nothing is touched when an untracked file is in the way.
    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.check_for_conflicts()?;
        self.repository.workspace().apply_migration(self)?;
        tracing::debug!(
            writes = self.writes().len(),
            deletes = self.deletes().count(),
            "migration applied"
        );

        Ok(())
    }

    pub fn check_for_conflicts(&mut self) -> anyhow::Result<()> {
        self.conflicts.clear();
        let repository = self.repository;
        let workspace = repository.workspace();
        let working_files = workspace.list_files()?;

        let writes = self
            .writes()
            .into_iter()
            .map(|(path, oid)| (path.clone(), oid.clone()))
            .collect::<Vec<_>>();
        for (path, oid) in &writes {
            self.check_parent_dirs(path);

            if self.current.contains_key(path) {
                continue;
            }

            if workspace.is_file(path) {
                if workspace.file_oid(path)?.as_ref() != Some(oid) {
                    self.record_conflict(ConflictType::UntrackedOverwritten, path);
                }
            } else if workspace.is_dir(path) {
                let prefix = format!("{path}/");
                let has_untracked = working_files
                    .iter()
                    .filter(|file| file.starts_with(&prefix))
                    .any(|file| !self.current.contains_key(file));

                if has_untracked {
                    self.record_conflict(ConflictType::UntrackedDirectory, path);
                }
            }
        }

        let deletes = self.deletes().cloned().collect::<Vec<_>>();
        for path in &deletes {
            if !self.current.contains_key(path) && workspace.is_file(path) {
                self.record_conflict(ConflictType::UntrackedRemoved, path);
            }
        }

        if self.conflicts.is_empty() {
            return Ok(());
        }

        for (conflict_type, paths) in &self.conflicts {
            tracing::debug!("{}", conflict_type.describe(paths));
        }
        let mut paths = self
            .conflicts
            .values()
            .flatten()
            .map(PathBuf::from)
            .collect::<Vec<_>>();
        paths.sort();
        paths.dedup();

        Err(BitletError::UntrackedFileConflict(paths).into())
    }

    /// An untracked file where one of the path's parent directories must go
    fn check_parent_dirs(&mut self, path: &str) {
        let repository = self.repository;
        let workspace = repository.workspace();
        let components = path.split('/').collect::<Vec<_>>();
        let mut parent = String::new();

        for component in &components[..components.len().saturating_sub(1)] {
            if !parent.is_empty() {
                parent.push('/');
            }
            parent.push_str(component);

            if workspace.is_file(&parent) && !self.current.contains_key(&parent) {
                let parent = parent.clone();
                self.record_conflict(ConflictType::UntrackedOverwritten, &parent);
            }
        }
    }

    fn record_conflict(&mut self, conflict_type: ConflictType, path: &str) {
        let paths = self.conflicts.entry(conflict_type).or_default();
        if !paths.iter().any(|existing| existing == path) {
            paths.push(path.to_string());
        }
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.repository.database().load_blob_data(object_id)
    }
}
