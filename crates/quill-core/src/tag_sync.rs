//! Exact-set tag synchronisation.
//!
//! Updating a post replaces its tag set with exactly the submitted set.
//! [`plan`] diffs the current set against the submitted one and returns
//! the attach/detach operations a repository needs to converge, so the
//! persistence layer never has to re-derive set semantics.

use std::collections::HashSet;

use uuid::Uuid;

/// Junction-table operations that turn the current tag set into the
/// submitted one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagSyncPlan {
    /// Tag ids to link to the post.
    pub attach: Vec<Uuid>,
    /// Tag ids to unlink from the post.
    pub detach: Vec<Uuid>,
}

impl TagSyncPlan {
    /// True when the submitted set already matches the current one.
    pub fn is_noop(&self) -> bool {
        self.attach.is_empty() && self.detach.is_empty()
    }
}

/// Diff `current` against `submitted`, treating both as sets.
///
/// Duplicates in `submitted` are collapsed so a repeated id cannot
/// produce a duplicate junction row. Order within the returned vectors
/// follows first appearance in the corresponding input, which keeps the
/// generated SQL deterministic.
pub fn plan(current: &[Uuid], submitted: &[Uuid]) -> TagSyncPlan {
    let current_set: HashSet<Uuid> = current.iter().copied().collect();
    let mut submitted_set = HashSet::with_capacity(submitted.len());

    let mut attach = Vec::new();
    for id in submitted {
        if submitted_set.insert(*id) && !current_set.contains(id) {
            attach.push(*id);
        }
    }

    let detach = current
        .iter()
        .filter(|id| !submitted_set.contains(id))
        .copied()
        .collect();

    TagSyncPlan { attach, detach }
}
