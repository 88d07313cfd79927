use crate::METADATA_DIR;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::remotes::Remotes;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A repository: working tree plus metadata directory
///
/// Every operation is a method on an explicit `Repository` value, so a local repository
/// and a remote one can be open side by side.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    remotes: Remotes,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);

        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create repository directory {:?}", path))?;
        }
        let path = path.canonicalize()?;
        let metadata_path = path.join(METADATA_DIR);

        let index = Index::new(metadata_path.join("index").into_boxed_path());
        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.clone().into_boxed_path());
        let remotes = Remotes::new(metadata_path.join("remotes").into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
            remotes,
        })
    }

    /// Open the repository owning a metadata directory, discarding its output
    pub fn open_metadata_dir(metadata_path: &Path) -> anyhow::Result<Self> {
        let root = metadata_path
            .parent()
            .with_context(|| format!("Invalid metadata directory {:?}", metadata_path))?;

        let repository = Self::new(&root.to_string_lossy(), Box::new(std::io::sink()))?;
        repository.ensure_initialized()?;

        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> Box<Path> {
        self.path.join(METADATA_DIR).into_boxed_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(BitletError::NotInitialized.into())
        }
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn remotes(&self) -> &Remotes {
        &self.remotes
    }

    /// ID and content of the current branch tip
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head_oid = self
            .refs()
            .read_head()?
            .with_context(|| format!("Current branch has no commits in {:?}", self.path))?;
        let commit = self.database().load_commit(&head_oid)?;

        Ok((head_oid, commit))
    }

    /// Resolve a revision (branch, `HEAD`/`@`, full or abbreviated commit ID)
    pub fn resolve_commit(&self, revision: &str) -> anyhow::Result<(ObjectId, Commit)> {
        let oid = Revision::resolve_str(revision, self)?;
        let commit = self
            .database()
            .parse_object_as_commit(&oid)?
            .ok_or_else(|| BitletError::NoSuchCommit(revision.to_string()))?;

        Ok((oid, commit))
    }
}
