//! Per-path three-way merge rule
//!
//! Each path is decided from its blob ID at the split point (s), in the current
//! commit (c) and in the given commit (g), any of which may be absent:
//!
//! | condition         | result                                   |
//! |-------------------|------------------------------------------|
//! | c == g            | keep the current version                 |
//! | s == c, g != c    | take g (delete when g is absent)         |
//! | s == g, c != g    | keep the current version                 |
//! | all three differ  | conflict                                 |

use crate::artifacts::objects::object_id::ObjectId;

pub const CONFLICT_START: &str = "<<<<<<< HEAD\n";
pub const CONFLICT_SEPARATOR: &str = "=======\n";
pub const CONFLICT_END: &str = ">>>>>>>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResolution {
    /// Leave the current version (or absence) in place
    Keep,
    /// Write the given version and stage it
    Take(ObjectId),
    /// Delete the file and stage the removal
    Delete,
    /// Write conflict markers around both versions and stage the result
    Conflict {
        current: Option<ObjectId>,
        given: Option<ObjectId>,
    },
}

pub fn resolve_path(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    given: Option<&ObjectId>,
) -> PathResolution {
    if current == given || split == given {
        PathResolution::Keep
    } else if split == current {
        match given {
            Some(oid) => PathResolution::Take(oid.clone()),
            None => PathResolution::Delete,
        }
    } else {
        PathResolution::Conflict {
            current: current.cloned(),
            given: given.cloned(),
        }
    }
}

/// Content of a conflicted file
///
/// An absent side contributes nothing; a non-empty side without a trailing newline
/// gets one.
pub fn conflict_content(current: Option<&[u8]>, given: Option<&[u8]>) -> Vec<u8> {
    let mut content = Vec::new();

    content.extend_from_slice(CONFLICT_START.as_bytes());
    push_side(&mut content, current);
    content.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
    push_side(&mut content, given);
    content.extend_from_slice(CONFLICT_END.as_bytes());

    content
}

fn push_side(content: &mut Vec<u8>, side: Option<&[u8]>) {
    let Some(side) = side else {
        return;
    };

    content.extend_from_slice(side);
    if side.last().is_some_and(|byte| *byte != b'\n') {
        content.push(b'\n');
    }
}
