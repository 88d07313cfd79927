//! Commit history traversal
//!
//! - `rev_list`: first-parent history of a commit (what `log` prints) and the full set
//!   of commits reachable through all parents (what merges and remote transfers need)

pub mod rev_list;
