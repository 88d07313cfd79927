//! Staged index entries
//!
//! An addition pairs a path with the blob ID of its staged content; a removal is a bare
//! path. Paths are repository-relative, forward-slash separated and at most
//! `MAX_PATH_SIZE` bytes long.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

/// Maximum path length supported in index entries
const MAX_PATH_SIZE: usize = u16::MAX as usize;

/// Size of the fixed part of an addition entry (blob ID + path length)
const ADDITION_PREFIX_SIZE: usize = OBJECT_ID_LENGTH / 2 + PATH_LENGTH_SIZE;

const PATH_LENGTH_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StagedAddition {
    pub path: String,
    pub oid: ObjectId,
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StagedRemoval {
    pub path: String,
}

impl StagedAddition {
    pub(crate) fn read_from(reader: &mut Checksum) -> anyhow::Result<Self> {
        let prefix = reader.read(ADDITION_PREFIX_SIZE)?;
        let oid = ObjectId::read_h40_from(&mut &prefix[..OBJECT_ID_LENGTH / 2])?;
        let path_length = byteorder::NetworkEndian::read_u16(&prefix[OBJECT_ID_LENGTH / 2..]);

        Ok(StagedAddition {
            path: read_path(reader, path_length as usize)?,
            oid,
        })
    }
}

impl StagedRemoval {
    pub(crate) fn read_from(reader: &mut Checksum) -> anyhow::Result<Self> {
        let path_length = byteorder::NetworkEndian::read_u16(&reader.read(PATH_LENGTH_SIZE)?);

        Ok(StagedRemoval {
            path: read_path(reader, path_length as usize)?,
        })
    }
}

impl Packable for StagedAddition {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(ADDITION_PREFIX_SIZE + self.path.len());
        self.oid.write_h40_to(&mut bytes)?;
        write_path(&mut bytes, &self.path)?;

        Ok(Bytes::from(bytes))
    }
}

impl Packable for StagedRemoval {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(PATH_LENGTH_SIZE + self.path.len());
        write_path(&mut bytes, &self.path)?;

        Ok(Bytes::from(bytes))
    }
}

fn write_path(bytes: &mut Vec<u8>, path: &str) -> anyhow::Result<()> {
    if path.len() > MAX_PATH_SIZE {
        return Err(anyhow!("Path too long for the index: {}", path));
    }

    bytes.write_u16::<byteorder::NetworkEndian>(path.len() as u16)?;
    bytes.write_all(path.as_bytes())?;

    Ok(())
}

fn read_path(reader: &mut Checksum, path_length: usize) -> anyhow::Result<String> {
    let path_bytes = reader.read(path_length)?;

    String::from_utf8(path_bytes.to_vec()).map_err(|_| anyhow!("Invalid path in index entry"))
}
