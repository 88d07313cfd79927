//! Command implementations
//!
//! Each command is an `async` method in its own `impl Repository` block:
//!
//! - `plumbing`: low-level object access (hash-object, cat-file) and the commit builder
//! - `porcelain`: user-facing version control workflows (add, commit, merge, push, ...)
//!
//! Commands report expected failures as [`crate::errors::BitletError`] and write their
//! output to the repository writer.

pub mod plumbing;
pub mod porcelain;
