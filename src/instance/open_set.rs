//! The decision variable: which locations are open.

use std::collections::BTreeSet;

use super::types::LocationId;

/// A set of open location identifiers.
///
/// Backed by an ordered set so iteration order, and therefore every
/// random draw indexed into it, is reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenSet(BTreeSet<LocationId>);

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: LocationId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Opens `id`. Returns `false` if it was already open.
    pub fn insert(&mut self, id: LocationId) -> bool {
        self.0.insert(id)
    }

    /// Closes `id`. Returns `false` if it was not open.
    pub fn remove(&mut self, id: LocationId) -> bool {
        self.0.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<LocationId> {
        self.iter().collect()
    }

    /// Members of `all` that are not open, in the order of `all`.
    pub fn closed_among(&self, all: &[LocationId]) -> Vec<LocationId> {
        all.iter().copied().filter(|id| !self.contains(*id)).collect()
    }

    /// The set obtained by closing `closed` and opening `opened`.
    pub fn swapped(&self, closed: LocationId, opened: LocationId) -> Self {
        let mut next = self.clone();
        next.remove(closed);
        next.insert(opened);
        next
    }

    /// Number of identifiers open in exactly one of the two sets.
    pub fn symmetric_difference_len(&self, other: &OpenSet) -> usize {
        self.0.symmetric_difference(&other.0).count()
    }

    /// Whether every member is one of `all`.
    pub fn is_subset_of(&self, all: &[LocationId]) -> bool {
        self.iter().all(|id| all.contains(&id))
    }
}

impl FromIterator<LocationId> for OpenSet {
    fn from_iter<I: IntoIterator<Item = LocationId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OpenSet {
    type Item = &'a LocationId;
    type IntoIter = std::collections::btree_set::Iter<'a, LocationId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for OpenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, "}}")
    }
}
