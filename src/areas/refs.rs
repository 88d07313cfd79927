//! References (branches and HEAD)
//!
//! Branches are files under `refs/heads/` holding the 40-character ID of their tip
//! commit. Names with slashes (such as the remote-tracking `origin/master`) are nested
//! directories. HEAD is always symbolic: `ref: refs/heads/<branch>`.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Branch and HEAD storage
///
/// Writes go through an exclusive file lock.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.gitlet`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef { sym_ref_name: SymRefName },
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Name of the branch HEAD points to
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        match SymRefOrOid::read_symref_or_oid(&self.head_path())? {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                BranchName::try_parse_sym_ref_name(&sym_ref_name)
            }
            Some(SymRefOrOid::Oid(oid)) => {
                anyhow::bail!("HEAD is detached at {}", oid.to_short_oid())
            }
            None => anyhow::bail!("HEAD is missing from {:?}", self.path),
        }
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == branch_name)
    }

    /// Point HEAD at a branch
    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        let sym_ref_name = SymRefName::for_branch(branch_name);
        self.update_ref_file(
            self.head_path(),
            format!("ref: {}", sym_ref_name.as_ref_path()),
        )?;
        tracing::info!(branch = %branch_name, "HEAD moved");

        Ok(())
    }

    /// Tip of the current branch
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path())
    }

    /// Move the current branch to a new commit
    pub fn update_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        let branch_name = self.current_branch()?;
        self.update_branch(&branch_name, oid)
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.branch_path(branch_name))
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    /// Create or move a branch
    pub fn update_branch(&self, branch_name: &BranchName, oid: ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(self.branch_path(branch_name), oid.as_ref().to_string())?;
        tracing::info!(branch = %branch_name, oid = %oid, "branch updated");

        Ok(())
    }

    /// Create a new branch, failing if one with the same name exists
    pub fn create_branch(&self, branch_name: &BranchName, oid: ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(branch_name) {
            return Err(BitletError::BranchExists(branch_name.to_string()).into());
        }

        self.update_branch(branch_name, oid)
    }

    /// Delete a branch pointer; the commits it pointed to stay in the store
    pub fn delete_branch(&self, branch_name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.branch_path(branch_name);

        match self.read_symref(&branch_path)? {
            Some(oid) => {
                std::fs::remove_file(&branch_path).with_context(|| {
                    format!("failed to delete branch file at {:?}", branch_path)
                })?;
                self.prune_branch_empty_parent_dirs(&branch_path)?;
                tracing::info!(branch = %branch_name, oid = %oid, "branch deleted");

                Ok(oid)
            }
            None => Err(BitletError::NoSuchBranch(branch_name.to_string()).into()),
        }
    }

    /// All branch names, sorted
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read_symref_or_oid(path)? {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                self.read_symref(self.path.join(sym_ref_name.as_ref_path()).as_path())
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;
        lock.deref_mut().write_all(b"\n")?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.heads_path().join(branch_name.as_ref()).into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
