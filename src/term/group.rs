use std::ops::BitOr;

use smallvec::SmallVec;

use crate::term::{NodeIndex, Term};
use crate::Ontology;
use crate::DEFAULT_NUM_PARENTS;

/// A sorted set of [`NodeIndex`]es
///
/// Used for the direct parents and children of each term. Most terms
/// have only a handful of those, so the group stays on the stack.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct TermGroup {
    ids: SmallVec<[NodeIndex; DEFAULT_NUM_PARENTS]>,
}

impl TermGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`NodeIndex`] to the group
    ///
    /// Returns `true` if the index was not yet present
    pub fn insert(&mut self, id: NodeIndex) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.ids.iter().copied()
    }

    fn get(&self, index: usize) -> Option<&NodeIndex> {
        self.ids.get(index)
    }
}

impl FromIterator<NodeIndex> for TermGroup {
    fn from_iter<T: IntoIterator<Item = NodeIndex>>(iter: T) -> Self {
        let mut group = TermGroup::new();
        for id in iter {
            group.insert(id);
        }
        group
    }
}

impl BitOr for &TermGroup {
    type Output = TermGroup;

    fn bitor(self, rhs: &TermGroup) -> TermGroup {
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut group = large.clone();
        for id in small.iter() {
            group.insert(id);
        }
        group
    }
}

/// Iterate [`Term`]s
///
/// This struct creates [`Term`]s from an owned group of node indexes, e.g.
/// the parents or children of a term or the result of a fan-out over several
/// resolved terms.
pub struct Terms<'a> {
    inner: TermGroup,
    ontology: &'a Ontology,
    idx: usize,
}

impl<'a> Terms<'a> {
    pub(crate) fn new(inner: TermGroup, ontology: &'a Ontology) -> Self {
        Self {
            inner,
            ontology,
            idx: 0,
        }
    }

    /// Returns the number of terms in the iterator, including consumed ones
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no terms
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<'a> Iterator for Terms<'a> {
    type Item = Term<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let index = *self.inner.get(self.idx)?;
            self.idx += 1;
            if let Some(term) = self.ontology.term_at(index) {
                return Some(term);
            }
        }
    }
}

impl std::fmt::Debug for Terms<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Terms({} terms)", self.inner.len())
    }
}
