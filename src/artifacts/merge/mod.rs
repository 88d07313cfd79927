//! Three-way merge
//!
//! - `split_point`: nearest common ancestor of the two commits
//! - `resolution`: the per-path rule and conflict file format
//!
//! [`MergePlan`] applies the rule to the union of paths of the split point, current and
//! given snapshots. It is pure: the merge command checks it against the working tree
//! before anything is written.

pub mod resolution;
pub mod split_point;

use crate::artifacts::merge::resolution::{PathResolution, resolve_path};
use crate::artifacts::objects::commit::TreeSnapshot;
use std::collections::{BTreeMap, BTreeSet};

/// What a merge did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The given commit is already an ancestor of the current one
    AlreadyUpToDate,
    /// The current branch was moved to the given commit without a merge commit
    FastForward,
    /// A two-parent merge commit was created
    Merged { conflict: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Every path that changes, with what happens to it
    resolutions: BTreeMap<String, PathResolution>,
}

impl MergePlan {
    pub fn compute(split: &TreeSnapshot, current: &TreeSnapshot, given: &TreeSnapshot) -> Self {
        let paths = split
            .keys()
            .chain(current.keys())
            .chain(given.keys())
            .collect::<BTreeSet<_>>();

        let resolutions = paths
            .into_iter()
            .filter_map(|path| {
                let resolution = resolve_path(split.get(path), current.get(path), given.get(path));
                (resolution != PathResolution::Keep).then(|| (path.clone(), resolution))
            })
            .collect();

        MergePlan { resolutions }
    }

    pub fn resolutions(&self) -> &BTreeMap<String, PathResolution> {
        &self.resolutions
    }

    pub fn has_conflicts(&self) -> bool {
        self.resolutions
            .values()
            .any(|resolution| matches!(resolution, PathResolution::Conflict { .. }))
    }
}
