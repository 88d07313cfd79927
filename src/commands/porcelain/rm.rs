use crate::areas::repository::Repository;
use crate::errors::BitletError;
use std::path::{Path, PathBuf};

impl Repository {
    /// Stop tracking a file
    ///
    /// A file tracked by the current commit is staged for removal and deleted from the
    /// working tree; a file that is only staged is just unstaged.
    pub async fn rm(&mut self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let path = self
            .workspace()
            .normalize(Path::new(file))
            .ok_or_else(|| BitletError::FileNotFound(PathBuf::from(file)))?;
        let (_, head) = self.head_commit()?;

        if head.tracks(&path) {
            index.mark_removed(&path);
            self.workspace().remove_file(&path)?;
        } else if !index.unstage(&path) {
            return Err(BitletError::NothingToRemove(PathBuf::from(file)).into());
        }

        index.write_updates()?;

        Ok(())
    }
}
