use crate::METADATA_DIR;
use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [METADATA_DIR, ".", ".."];

/// The working tree
///
/// Paths handed in and out are repository-relative strings with forward slashes, the
/// same keys commits and the staging index use.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, path: &str) -> anyhow::Result<Blob> {
        let data = self.read_file(path)?;
        Ok(Blob::new(data))
    }

    /// ID the file's content would have as a blob, without storing it
    pub fn file_oid(&self, path: &str) -> anyhow::Result<Option<ObjectId>> {
        if !self.is_file(path) {
            return Ok(None);
        }

        Ok(Some(self.parse_blob(path)?.object_id()?))
    }

    /// Every plain file in the working tree, sorted, skipping the metadata directory
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.path)
                    .map(|relative_path| !Self::is_ignored(relative_path))
                    .unwrap_or(true)
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.to_tracked_path(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    /// Normalize a path given on the command line to a tracked path
    ///
    /// `.` and `..` are resolved lexically against the working tree root. `None` when the
    /// path leaves the working tree, names the metadata directory or anything inside it,
    /// or cannot be stored as a tracked path (line breaks end an entry in a commit).
    pub fn normalize(&self, file_path: &Path) -> Option<String> {
        let relative_path = if file_path.is_absolute() {
            file_path.strip_prefix(&self.path).ok()?
        } else {
            file_path
        };

        let mut components = Vec::new();
        for component in relative_path.components() {
            match component {
                Component::Normal(name) => components.push(name.to_str()?),
                Component::CurDir => {}
                Component::ParentDir => {
                    components.pop()?;
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        let tracked_path = components.join("/");
        Self::is_trackable(&tracked_path).then_some(tracked_path)
    }

    fn is_trackable(path: &str) -> bool {
        !path.is_empty()
            && !path.contains(['\n', '\r'])
            && !Self::is_ignored(Path::new(path))
    }

    pub fn is_file(&self, path: &str) -> bool {
        self.path.join(path).is_file()
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.path.join(path).is_dir()
    }

    pub fn read_file(&self, file_path: &str) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", full_path))?;

        Ok(content.into())
    }

    /// Write a file, creating its parent directories as needed
    pub fn write_file(&self, file_path: &str, data: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            self.make_directory(parent)?;
        }
        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path)
                .with_context(|| format!("Failed to remove existing directory: {:?}", file_path))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete a file if it exists, then prune directories left empty
    pub fn remove_file(&self, file_path: &str) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }
        self.prune_empty_parent_dirs(&full_path)
    }

    // The order of applying migrations is important:
    // deletions first, so that a directory can replace a deleted file of the same name
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        self.apply_migration_action_set(migration, ActionType::Delete)?;
        self.apply_migration_action_set(migration, ActionType::Modify)?;
        self.apply_migration_action_set(migration, ActionType::Add)?;

        Ok(())
    }

    fn apply_migration_action_set(
        &self,
        migration: &Migration,
        action: ActionType,
    ) -> anyhow::Result<()> {
        for (file_path, oid) in migration.actions_of(&action) {
            match (&action, oid) {
                (ActionType::Delete, None) => self.remove_file(file_path)?,
                (ActionType::Add | ActionType::Modify, Some(oid)) => {
                    let data = migration.load_blob_data(oid)?;
                    self.write_file(file_path, &data)?;
                }
                _ => anyhow::bail!("Invalid action and entry combination for {file_path}"),
            }
        }

        Ok(())
    }

    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        // a file where a directory should be is replaced
        for ancestor in dir_path
            .ancestors()
            .take_while(|ancestor| ancestor.starts_with(&self.path) && *ancestor != &*self.path)
        {
            if ancestor.is_file() {
                std::fs::remove_file(ancestor)
                    .with_context(|| format!("Failed to remove file: {:?}", ancestor))?;
            }
        }

        std::fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {:?}", dir_path))
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(&self.path)
            && parent.is_dir()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("Failed to remove empty directory: {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn to_tracked_path(&self, path: &Path) -> Option<String> {
        let relative_path = path.strip_prefix(self.path.as_ref()).ok()?;
        Some(Self::components_to_string(relative_path))
    }

    fn components_to_string(path: &Path) -> String {
        path.components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn workspace_dir() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        dir.child("a.txt").write_str("a").unwrap();
        dir.child("nested/deeper/b.txt").write_str("b").unwrap();
        dir.child(".gitlet/HEAD").write_str("ref: refs/heads/master").unwrap();
        dir
    }

    #[rstest]
    fn lists_files_without_metadata(workspace_dir: TempDir) {
        let workspace = Workspace::new(workspace_dir.path().into());

        assert_eq!(
            workspace.list_files().unwrap(),
            vec!["a.txt".to_string(), "nested/deeper/b.txt".to_string()]
        );
    }

    #[rstest]
    fn removing_the_last_file_prunes_its_directories(workspace_dir: TempDir) {
        let workspace = Workspace::new(workspace_dir.path().into());

        workspace.remove_file("nested/deeper/b.txt").unwrap();

        assert!(!workspace.is_dir("nested"));
        assert!(workspace.is_file("a.txt"));
    }

    #[rstest]
    fn writing_under_a_file_replaces_the_file(workspace_dir: TempDir) {
        let workspace = Workspace::new(workspace_dir.path().into());

        workspace.write_file("a.txt/inner.txt", b"inner").unwrap();

        assert!(workspace.is_dir("a.txt"));
        assert_eq!(workspace.read_file("a.txt/inner.txt").unwrap().as_ref(), b"inner");
    }

    #[rstest]
    #[case("./nested/deeper/b.txt", Some("nested/deeper/b.txt"))]
    #[case("nested/../a.txt", Some("a.txt"))]
    #[case("nested/deeper/./../deeper/b.txt", Some("nested/deeper/b.txt"))]
    #[case("../a.txt", None)]
    #[case("nested/../../a.txt", None)]
    #[case(".", None)]
    #[case(".gitlet/HEAD", None)]
    #[case("./.gitlet", None)]
    #[case("nested/../.gitlet/objects", None)]
    #[case("a\nfile x", None)]
    #[case("carriage\rreturn", None)]
    fn normalizes_command_line_paths(
        workspace_dir: TempDir,
        #[case] file: &str,
        #[case] expected: Option<&str>,
    ) {
        let workspace = Workspace::new(workspace_dir.path().into());

        assert_eq!(
            workspace.normalize(Path::new(file)),
            expected.map(str::to_string)
        );
    }

    #[rstest]
    fn normalizes_absolute_paths_inside_the_working_tree(workspace_dir: TempDir) {
        let workspace = Workspace::new(workspace_dir.path().into());

        assert_eq!(
            workspace.normalize(&workspace_dir.path().join("a.txt")),
            Some("a.txt".to_string())
        );
        assert_eq!(
            workspace.normalize(&workspace_dir.path().join(".gitlet").join("HEAD")),
            None
        );
        assert_eq!(workspace.normalize(Path::new("/elsewhere/a.txt")), None);
    }
}
