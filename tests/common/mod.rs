#![allow(dead_code)]

pub mod command;
pub mod file;

/// Timestamp pinned on every commit made by the tests
pub const COMMIT_DATE: &str = "2022-01-01 12:00:00 +0000";
