//! Novelty archive retained for future novelty comparisons.

use std::collections::HashSet;

use super::individual::{Member, MemberId};

/// Insertion-ordered, duplicate-free set of archived members.
///
/// Membership is by [`MemberId`]. Entries are never evicted, so the archive
/// only grows during a run.
#[derive(Debug, Clone)]
pub struct NoveltyArchive<I> {
    /// Archived members in insertion order.
    members: Vec<Member<I>>,
    /// Handles of archived members.
    ids: HashSet<MemberId>,
}

impl<I> Default for NoveltyArchive<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> NoveltyArchive<I> {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Check whether a handle is archived.
    pub fn contains(&self, id: MemberId) -> bool {
        self.ids.contains(&id)
    }

    /// Get an archived member by handle.
    pub fn get(&self, id: MemberId) -> Option<&Member<I>> {
        if !self.contains(id) {
            return None;
        }
        self.members.iter().find(|m| m.id() == id)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Member<I>> {
        self.members.iter()
    }

    /// Archived members in insertion order.
    pub fn members(&self) -> &[Member<I>] {
        &self.members
    }

    /// Get top N members by the novelty they had when archived.
    pub fn top_n(&self, n: usize) -> Vec<&Member<I>> {
        let mut members: Vec<_> = self.members.iter().collect();
        members.sort_by(|a, b| {
            b.novelty()
                .total_cmp(&a.novelty())
                .then_with(|| a.id().cmp(&b.id()))
        });
        members.into_iter().take(n).collect()
    }

    /// Get archive size.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if archive is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<I: Clone> NoveltyArchive<I> {
    /// Archive a copy of the member. Returns `false` if its handle is
    /// already present.
    pub fn insert(&mut self, member: &Member<I>) -> bool {
        if !self.ids.insert(member.id()) {
            return false;
        }
        self.members.push(member.clone());
        true
    }
}
