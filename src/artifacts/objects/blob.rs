//! Blob object
//!
//! A blob is one file's content at one point in time, stored as raw bytes with no name
//! or metadata. Two files with identical content share a single blob.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut blob_bytes = Vec::with_capacity(self.content.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn identical_content_has_identical_ids() {
        let first = Blob::new(Bytes::from_static(b"hello"));
        let second = Blob::new(Bytes::from_static(b"hello"));
        let other = Blob::new(Bytes::from_static(b"world"));

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        assert_ne!(first.object_id().unwrap(), other.object_id().unwrap());
    }

    #[test]
    fn binary_content_is_kept_verbatim() {
        let content = Bytes::from_static(&[0, 159, 146, 150, b'\n', 0]);
        let blob = Blob::new(content.clone());

        let serialized = blob.serialize().unwrap();
        let mut reader = Cursor::new(serialized);
        let object_type = ObjectType::parse_object_type(&mut reader).unwrap();
        let parsed = Blob::deserialize(reader).unwrap();

        assert_eq!(object_type, ObjectType::Blob);
        assert_eq!(parsed.content(), &content);
    }
}
