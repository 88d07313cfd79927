//! Object transfer between repositories
//!
//! Fetch and push both come down to copying every object reachable from a branch tip
//! that the other store is missing. IDs depend only on content, so objects are copied
//! byte for byte and a copy that already exists is skipped.

pub mod transfer;
