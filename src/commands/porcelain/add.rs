use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::BitletError;
use std::path::{Path, PathBuf};

impl Repository {
    /// Stage files for the next commit
    ///
    /// A file whose content matches the current commit is unstaged instead, which also
    /// cancels a pending removal.
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        let paths = paths
            .iter()
            .map(|file| {
                self.workspace()
                    .normalize(Path::new(file))
                    .filter(|path| self.workspace().is_file(path))
                    .ok_or_else(|| BitletError::FileNotFound(PathBuf::from(file)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (_, head) = self.head_commit()?;

        for path in paths {
            let blob = self.workspace().parse_blob(&path)?;
            let blob_id = blob.object_id()?;

            if head.blob_for(&path) == Some(&blob_id) {
                index.unstage(&path);
                index.unmark_removed(&path);
                continue;
            }

            self.database().store(&blob)?;
            index.add(&path, blob_id);
        }

        index.write_updates()?;

        Ok(())
    }
}
