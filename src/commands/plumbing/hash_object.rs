use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use std::io::Write;
use std::path::{Path, PathBuf};

impl Repository {
    pub async fn hash_object(&mut self, file: &str, write: bool) -> anyhow::Result<ObjectId> {
        let path = self
            .workspace()
            .normalize(Path::new(file))
            .filter(|path| self.workspace().is_file(path))
            .ok_or_else(|| BitletError::FileNotFound(PathBuf::from(file)))?;

        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;

        writeln!(self.writer(), "{}", blob_id)?;

        // write (if requested) as compressed object file
        if write {
            self.ensure_initialized()?;
            self.database().store(&blob)?;
        }

        Ok(blob_id)
    }
}
