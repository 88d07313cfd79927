use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::BitletError;
use std::io::Write;

impl Repository {
    /// Print a stored object: raw bytes for a blob, the stored text for a commit
    pub async fn cat_file(&mut self, object_id: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let object_id = match self.database().find_objects_by_prefix(object_id)?.as_slice() {
            [object_id] => object_id.clone(),
            [] => ObjectId::try_parse(object_id.to_string())?,
            _ => return Err(BitletError::AmbiguousCommitId(object_id.to_string()).into()),
        };

        let object = self.database().parse_object(&object_id)?;
        write!(self.writer(), "{}", object.display())?;

        Ok(())
    }
}
