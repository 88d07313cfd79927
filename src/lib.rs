//! bitlet: a small, local version-control system
//!
//! - `areas`: persistent repository areas (object database, staging index, refs, remotes, workspace)
//! - `artifacts`: data structures and algorithms (objects, checkout migrations, merge, remote transfer)
//! - `commands`: one `impl Repository` block per user-facing command
//! - `errors`: the domain error taxonomy reported at the command boundary

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

/// Name of the repository metadata directory
pub const METADATA_DIR: &str = ".gitlet";
