use std::collections::HashMap;

use crate::term::internal::TermInternal;
use crate::term::{NodeIndex, Relation};
use crate::DEFAULT_NUM_TERMS;

/// Storage of all nodes and their connections
///
/// Nodes are addressed by their [`NodeIndex`], which never changes once
/// the node is inserted.
pub(crate) struct Arena {
    terms: Vec<TermInternal>,
    ids: HashMap<Box<str>, NodeIndex>,
    relations: HashMap<(NodeIndex, NodeIndex), Relation>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn insert(&mut self, term: TermInternal) -> NodeIndex {
        let index = NodeIndex::from(self.terms.len());
        self.ids.insert(term.id().as_str().into(), index);
        self.terms.push(term);
        index
    }

    /// Swaps the node at `index` for `term`, keeping its position
    ///
    /// The new node must have the same id as the old one.
    pub fn replace(&mut self, index: NodeIndex, term: TermInternal) {
        debug_assert_eq!(self.terms[index.as_usize()].id(), term.id());
        self.terms[index.as_usize()] = term;
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    pub fn get(&self, index: NodeIndex) -> Option<&TermInternal> {
        self.terms.get(index.as_usize())
    }

    pub fn get_unchecked(&self, index: NodeIndex) -> &TermInternal {
        &self.terms[index.as_usize()]
    }

    pub fn get_unchecked_mut(&mut self, index: NodeIndex) -> &mut TermInternal {
        &mut self.terms[index.as_usize()]
    }

    /// Adds a parent -> child edge
    ///
    /// Returns `false` if the edge was already present. The relation
    /// of an existing edge is not changed.
    pub fn connect(&mut self, parent: NodeIndex, child: NodeIndex, relation: Relation) -> bool {
        let added = self.get_unchecked_mut(parent).add_child(child);
        self.get_unchecked_mut(child).add_parent(parent);
        self.relations.entry((parent, child)).or_insert(relation);
        added
    }

    pub fn relation(&self, parent: NodeIndex, child: NodeIndex) -> Option<&Relation> {
        self.relations.get(&(parent, child))
    }

    pub fn n_edges(&self) -> usize {
        self.relations.len()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            terms: Vec::with_capacity(DEFAULT_NUM_TERMS),
            ids: HashMap::with_capacity(DEFAULT_NUM_TERMS),
            relations: HashMap::with_capacity(DEFAULT_NUM_TERMS),
        }
    }
}
