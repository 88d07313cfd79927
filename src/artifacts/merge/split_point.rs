//! Split point discovery
//!
//! The split point of the current commit C and the given commit G is their nearest
//! common ancestor, the base of a three-way merge.
//!
//! ## Algorithm
//!
//! 1. Walk every ancestor of G (through all parents) and mark it `REACHABLE_FROM_GIVEN`.
//! 2. Walk C's history breadth-first, first parent before second parent, marking
//!    commits `VISITED_FROM_CURRENT`. The first commit that is already marked from G is
//!    the split point.
//!
//! On histories made only of first-parent links this yields the first commit common
//! to both first-parent chains, preferring C's more recent ancestors. Merge commits are
//! handled naturally since the walk follows second parents too.
//!
//! The finder does not know how commits are stored: it takes a closure returning the
//! parents of a commit, so tests can run it over an in-memory graph.

use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const REACHABLE_FROM_GIVEN = 0b01;
        const VISITED_FROM_CURRENT = 0b10;
        const SPLIT_POINT = Self::REACHABLE_FROM_GIVEN.bits() | Self::VISITED_FROM_CURRENT.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::REACHABLE_FROM_GIVEN) {
            flags.push("GIVEN");
        }
        if self.contains(VisitState::VISITED_FROM_CURRENT) {
            flags.push("CURRENT");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

pub struct SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    /// Returns the parents of a commit, first parent first
    parents_loader: ParentsLoaderFn,
}

impl<ParentsLoaderFn> SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(parents_loader: ParentsLoaderFn) -> Self {
        Self { parents_loader }
    }

    /// Nearest common ancestor of `current` and `given`
    ///
    /// `None` only when the two histories share no commit at all.
    pub fn find_split_point(
        &self,
        current: &ObjectId,
        given: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut states = HashMap::<ObjectId, VisitState>::new();

        self.walk(given, |oid| {
            let state = states.entry(oid.clone()).or_insert(VisitState::NONE);
            if state.contains(VisitState::REACHABLE_FROM_GIVEN) {
                return WalkStep::Skip;
            }
            state.insert(VisitState::REACHABLE_FROM_GIVEN);
            WalkStep::Continue
        })?;

        let mut split_point = None;
        self.walk(current, |oid| {
            let state = states.entry(oid.clone()).or_insert(VisitState::NONE);
            if state.contains(VisitState::VISITED_FROM_CURRENT) {
                return WalkStep::Skip;
            }
            state.insert(VisitState::VISITED_FROM_CURRENT);

            if state.contains(VisitState::SPLIT_POINT) {
                split_point = Some(oid.clone());
                WalkStep::Stop
            } else {
                WalkStep::Continue
            }
        })?;

        tracing::debug!(
            current = %current.to_short_oid(),
            given = %given.to_short_oid(),
            split_point = ?split_point.as_ref().map(ObjectId::to_short_oid),
            visited = states.len(),
            "split point search finished"
        );

        Ok(split_point)
    }

    /// Breadth-first walk from `start`, visiting parents in order
    fn walk(
        &self,
        start: &ObjectId,
        mut visit: impl FnMut(&ObjectId) -> WalkStep,
    ) -> anyhow::Result<()> {
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(oid) = queue.pop_front() {
            match visit(&oid) {
                WalkStep::Stop => break,
                WalkStep::Skip => continue,
                WalkStep::Continue => queue.extend((self.parents_loader)(&oid)?),
            }
        }

        Ok(())
    }
}

enum WalkStep {
    Continue,
    Skip,
    Stop,
}
