//! Plumbing commands
//!
//! - `hash-object`: Compute a file's blob ID and optionally store it
//! - `cat-file`: Print a stored object
//! - `write_commit`: Build, store and check in a commit from the staging index

pub mod cat_file;
pub mod hash_object;
mod write_commit;
