//! Repository status
//!
//! Compares the working tree with the staging index and the current commit.
//!
//! ## Components
//!
//! - `file_change`: change kinds and status sections
//! - `status_info`: the comparison itself

pub mod file_change;
pub mod status_info;
