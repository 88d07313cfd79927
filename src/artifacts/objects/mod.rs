//! Stored object types
//!
//! Everything in the object database is identified by the SHA-1 of its serialized form.
//! There are two kinds of objects:
//!
//! - **Blob**: one file's content (raw bytes)
//! - **Commit**: message, timestamp, parent commit(s) and the full tree snapshot
//!
//! Both share the `<type> <size>\0<content>` envelope.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Shortest hex prefix accepted when resolving an abbreviated commit id
pub const MIN_OBJECT_ID_PREFIX: usize = 4;
