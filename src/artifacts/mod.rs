//! Data structures and algorithms
//!
//! - `branch`: Branch names and revision parsing
//! - `checkout`: Working-tree migrations and untracked-file conflict detection
//! - `core`: Shared utilities (pager wrapper, etc.)
//! - `index`: Staging index file format
//! - `log`: Commit history traversal
//! - `merge`: Split point discovery and the three-way merge rule
//! - `objects`: Stored object types (blob, commit)
//! - `remote`: Object transfer between repositories
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod remote;
pub mod status;
