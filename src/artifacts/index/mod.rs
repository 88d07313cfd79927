//! Staging index file format
//!
//! The index records what the next commit will change relative to the current one:
//! staged additions (path → blob ID) and paths staged for removal.
//!
//! ## File Format (Version 1)
//!
//! ```text
//! Header (16 bytes):
//!   - Signature: "BSTG" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Addition count (4 bytes)
//!   - Removal count (4 bytes)
//!
//! Additions (variable length, sorted by path):
//!   - Blob ID (20 bytes)
//!   - Path length (2 bytes)
//!   - Path (UTF-8, forward slashes)
//!
//! Removals (variable length, sorted by path):
//!   - Path length (2 bytes)
//!   - Path
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod index_entry;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 16; // marker, version, additions and removals, 4 bytes each

/// Magic signature identifying staging index files
pub const SIGNATURE: &str = "BSTG";

/// Index file format version
pub const VERSION: u32 = 1;
