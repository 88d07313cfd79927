//! Working-tree migrations
//!
//! Moving the working tree from one snapshot to another (branch checkout, reset,
//! fast-forward and merge) is planned first and applied second. Every untracked file
//! the plan would clobber is reported before any file is touched.

pub mod conflict;
pub mod migration;
