//! Core repository components
//!
//! - `database`: Object database for storing blobs and commits
//! - `index`: Staging index (pending additions and removals)
//! - `refs`: Branches and HEAD
//! - `remotes`: Named remote repository locations
//! - `repository`: High-level repository operations and coordination
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod remotes;
pub mod repository;
pub mod workspace;
