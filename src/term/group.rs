use std::ops::{BitAnd, BitOr};

use crate::HpoTermId;

/// A set of [`HpoTermId`] representing a group of HPO terms
///
/// Each term can occur only once in the group. The ids are kept sorted,
/// so iteration order is deterministic.
///
/// This group is used e.g. for the parents of a term or the annotations of a disease
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HpoGroup {
    ids: Vec<HpoTermId>,
}

impl HpoGroup {
    /// Constructs a new, empty [`HpoGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`HpoGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`HpoTermId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`HpoTermId`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`HpoTermId`] to the group
    ///
    /// Returns whether the `HpoTermId` was newly inserted. That is:
    ///
    /// - If the group did not previously contain this `HpoTermId`, true is returned.
    /// - If the group already contained this `HpoTermId`, false is returned.
    ///
    pub fn insert<I: Into<HpoTermId>>(&mut self, id: I) -> bool {
        let id = id.into();
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Returns `true` if the group contains the [`HpoTermId`]
    pub fn contains(&self, id: &HpoTermId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns an Iterator of the [`HpoTermId`]s inside the group
    pub fn iter(&self) -> HpoTermIds {
        HpoTermIds::new(self.ids.iter())
    }

    /// Returns `true` if both groups share at least one [`HpoTermId`]
    pub fn intersects(&self, other: &HpoGroup) -> bool {
        let (large, small) = if self.len() > other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.ids.iter().any(|id| large.contains(id))
    }
}

impl FromIterator<HpoTermId> for HpoGroup {
    fn from_iter<T: IntoIterator<Item = HpoTermId>>(iter: T) -> Self {
        let mut group = HpoGroup::new();
        for id in iter {
            group.insert(id);
        }
        group
    }
}

impl From<Vec<HpoTermId>> for HpoGroup {
    fn from(ids: Vec<HpoTermId>) -> Self {
        ids.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a HpoGroup {
    type Item = HpoTermId;

    type IntoIter = HpoTermIds<'a>;

    fn into_iter(self) -> HpoTermIds<'a> {
        HpoTermIds::new(self.ids.iter())
    }
}

/// An iterator over [`HpoTermId`]s
pub struct HpoTermIds<'a> {
    inner: std::slice::Iter<'a, HpoTermId>,
}

impl<'a> HpoTermIds<'a> {
    fn new(inner: std::slice::Iter<'a, HpoTermId>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for HpoTermIds<'a> {
    type Item = HpoTermId;
    fn next(&mut self) -> Option<HpoTermId> {
        self.inner.next().copied()
    }
}

impl BitOr for &HpoGroup {
    type Output = HpoGroup;

    fn bitor(self, rhs: &HpoGroup) -> HpoGroup {
        let mut group = HpoGroup::with_capacity(self.len() + rhs.len());
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        group.ids.extend_from_slice(&large.ids);
        for id in &small.ids {
            group.insert(*id);
        }
        group
    }
}

impl BitAnd for &HpoGroup {
    type Output = HpoGroup;

    fn bitand(self, rhs: &HpoGroup) -> HpoGroup {
        let mut group = HpoGroup::with_capacity(self.len().min(rhs.len()));
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };

        // `small` is sorted, so pushing keeps the order
        for id in &small.ids {
            if large.contains(id) {
                group.ids.push(*id);
            }
        }
        group
    }
}
