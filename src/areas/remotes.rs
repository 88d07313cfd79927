//! Remote registry
//!
//! A remote is a name bound to another repository on the local filesystem, stored as a
//! one-line file `remotes/<name>` holding the location. The location may point at the
//! other repository's metadata directory or at its root.

use crate::METADATA_DIR;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::BitletError;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct Remotes {
    /// Path to the registry directory (typically `.gitlet/remotes`)
    path: Box<Path>,
}

impl Remotes {
    pub fn add(&self, name: &str, location: &str) -> anyhow::Result<()> {
        Self::validate_name(name)?;

        let remote_path = self.path.join(name);
        if remote_path.exists() {
            return Err(BitletError::RemoteExists(name.to_string()).into());
        }

        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("failed to create remotes directory at {:?}", self.path))?;
        std::fs::write(&remote_path, format!("{location}\n"))
            .with_context(|| format!("failed to write remote file at {:?}", remote_path))?;
        tracing::info!(remote = name, location, "remote added");

        Ok(())
    }

    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        let remote_path = self.path.join(name);
        if !Self::is_valid_name(name) || !remote_path.is_file() {
            return Err(BitletError::NoSuchRemote(name.to_string()).into());
        }

        std::fs::remove_file(&remote_path)
            .with_context(|| format!("failed to delete remote file at {:?}", remote_path))?;
        tracing::info!(remote = name, "remote removed");

        Ok(())
    }

    /// Stored location of a remote, exactly as it was registered
    pub fn location(&self, name: &str) -> anyhow::Result<PathBuf> {
        let remote_path = self.path.join(name);
        if !Self::is_valid_name(name) || !remote_path.is_file() {
            return Err(BitletError::NoSuchRemote(name.to_string()).into());
        }

        let location = std::fs::read_to_string(&remote_path)
            .with_context(|| format!("failed to read remote file at {:?}", remote_path))?;

        Ok(PathBuf::from(location.trim_end_matches(['\r', '\n'])))
    }

    /// Metadata directory of a remote
    ///
    /// Relative locations are taken relative to `base`, the local repository root.
    pub fn metadata_dir(&self, name: &str, base: &Path) -> anyhow::Result<PathBuf> {
        let location = base.join(self.location(name)?);

        let nested = location.join(METADATA_DIR);
        if Self::looks_like_metadata_dir(&nested) {
            return Ok(nested);
        }
        if Self::looks_like_metadata_dir(&location) {
            return Ok(location);
        }

        Err(BitletError::RemoteDirNotFound(location).into())
    }

    fn looks_like_metadata_dir(path: &Path) -> bool {
        path.join("HEAD").is_file() && path.join("objects").is_dir()
    }

    /// A single path component that is also a valid branch name prefix, so that
    /// `<remote>/<branch>` tracking branches can always be created
    fn is_valid_name(name: &str) -> bool {
        !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && BranchName::try_parse(name.to_string()).is_ok()
    }

    fn validate_name(name: &str) -> anyhow::Result<()> {
        if Self::is_valid_name(name) {
            Ok(())
        } else {
            Err(BitletError::IncorrectOperands.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn remotes_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    #[rstest]
    fn registers_and_removes_remotes(remotes_dir: TempDir) {
        let remotes = Remotes::new(remotes_dir.path().join("remotes").into_boxed_path());

        remotes.add("origin", "../other/.gitlet").unwrap();
        assert_eq!(
            remotes.location("origin").unwrap(),
            PathBuf::from("../other/.gitlet")
        );
        assert!(matches!(
            BitletError::find(&remotes.add("origin", "elsewhere").unwrap_err()),
            Some(BitletError::RemoteExists(_))
        ));

        remotes.remove("origin").unwrap();
        remotes_dir.child("remotes/origin").assert(predicates::path::missing());
        assert!(matches!(
            BitletError::find(&remotes.remove("origin").unwrap_err()),
            Some(BitletError::NoSuchRemote(_))
        ));
    }

    #[rstest]
    #[case("a..b")]
    #[case("x.lock")]
    #[case(".hidden")]
    #[case("nested/name")]
    #[case("")]
    fn rejects_names_unusable_as_tracking_branch_prefixes(
        remotes_dir: TempDir,
        #[case] name: &str,
    ) {
        let remotes = Remotes::new(remotes_dir.path().join("remotes").into_boxed_path());

        let error = remotes.add(name, "../other").unwrap_err();

        assert!(matches!(
            BitletError::find(&error),
            Some(BitletError::IncorrectOperands)
        ));
        remotes_dir.child("remotes").assert(predicates::path::missing());
    }

    #[rstest]
    fn locations_may_name_the_root_or_the_metadata_dir(remotes_dir: TempDir) {
        let remotes = Remotes::new(remotes_dir.path().join("remotes").into_boxed_path());
        remotes_dir.child("other/.gitlet/HEAD").touch().unwrap();
        remotes_dir.child("other/.gitlet/objects").create_dir_all().unwrap();
        remotes.add("root", "other").unwrap();
        remotes.add("meta", "other/.gitlet").unwrap();
        remotes.add("gone", "missing").unwrap();

        let expected = remotes_dir.path().join("other").join(METADATA_DIR);
        assert_eq!(remotes.metadata_dir("root", remotes_dir.path()).unwrap(), expected);
        assert_eq!(remotes.metadata_dir("meta", remotes_dir.path()).unwrap(), expected);
        assert!(matches!(
            BitletError::find(&remotes.metadata_dir("gone", remotes_dir.path()).unwrap_err()),
            Some(BitletError::RemoteDirNotFound(_))
        ));
    }
}
