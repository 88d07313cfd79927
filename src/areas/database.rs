//! Object database
//!
//! Append-only, content-addressed storage. Every object is written once under
//! `objects/<xx>/<yyyy...>` (zlib-compressed) and never updated or deleted.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::BitletError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Read an object's serialized bytes (envelope included)
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        if !self.exists(object_id) {
            return Err(BitletError::ObjectNotFound(object_id.clone()).into());
        }

        self.read_object(self.path.join(object_id.to_path()))
    }

    /// Store an object and return its ID
    ///
    /// Storing the same content twice is a no-op the second time.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_content = object.serialize()?;
        let object_id = ObjectId::hash_of(&object_content);
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object_content)?;
            tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        Ok(object_id)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Load a commit that must exist
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", object_id))
    }

    /// Load a blob's content that must exist
    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.parse_object_as_blob(object_id)?
            .map(Blob::into_content)
            .ok_or_else(|| anyhow::anyhow!("object {} is not a blob", object_id))
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    /// Copy a stored object, as is, into another database
    ///
    /// IDs are pure functions of content, so no re-hashing is needed and copying an
    /// object the target already has is a no-op.
    pub fn copy_object_to(&self, target: &Database, object_id: &ObjectId) -> anyhow::Result<bool> {
        if target.exists(object_id) {
            return Ok(false);
        }

        let source_path = self.path.join(object_id.to_path());
        let target_path = target.path.join(object_id.to_path());
        if !source_path.is_file() {
            return Err(BitletError::ObjectNotFound(object_id.clone()).into());
        }

        let target_dir = target_path
            .parent()
            .context(format!("Invalid object path {}", target_path.display()))?;
        std::fs::create_dir_all(target_dir).context(format!(
            "Unable to create object directory {}",
            target_dir.display()
        ))?;

        let temp_object_path = target_dir.join(Self::generate_temp_name());
        std::fs::copy(&source_path, &temp_object_path).context(format!(
            "Unable to copy object {} to {}",
            object_id,
            target_dir.display()
        ))?;
        std::fs::rename(&temp_object_path, &target_path).context(format!(
            "Unable to rename object file to {}",
            target_path.display()
        ))?;

        Ok(true)
    }

    /// Every object ID in the database, in path order
    pub fn list_objects(&self) -> anyhow::Result<Vec<ObjectId>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        Ok(WalkDir::new(&self.path)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&self.path).ok()?;
                ObjectId::try_from_object_path(relative_path).ok()
            })
            .collect())
    }

    /// Every stored commit, paired with its ID
    pub fn list_commits(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();

        for object_id in self.list_objects()? {
            if let Some(commit) = self.parse_object_as_commit(&object_id)? {
                commits.push((object_id, commit));
            }
        }

        Ok(commits)
    }

    /// Find all objects whose ID starts with the given prefix
    ///
    /// Used to resolve abbreviated IDs. More than one match means the prefix is ambiguous.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }
        let prefix = prefix.to_ascii_lowercase();

        // with 2+ characters only the matching fan-out directory needs scanning
        if prefix.len() >= 2 {
            let (dir_name, file_prefix) = prefix.split_at(2);
            let dir_path = self.path.join(dir_name);

            if !dir_path.is_dir() {
                return Ok(Vec::new());
            }

            let mut matches = Vec::new();
            for entry in std::fs::read_dir(&dir_path)? {
                let file_name = entry?.file_name();
                let file_name = file_name.to_string_lossy();

                if file_name.starts_with(file_prefix)
                    && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
                {
                    matches.push(oid);
                }
            }
            matches.sort();

            Ok(matches)
        } else {
            Ok(self
                .list_objects()?
                .into_iter()
                .filter(|oid| oid.starts_with(&prefix))
                .collect())
        }
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
