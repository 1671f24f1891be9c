use crate::annotations::{Entities, Population};
use crate::term::internal::{TermData, TermInternal};
use crate::term::{NodeIndex, Relation, TermId, Terms};
use crate::Ontology;

/// The `Term` represents a single term of the ontology
///
/// It is a cheap, borrowed view into the [`Ontology`] and gives access to
/// the term's attributes, its neighbours and its annotation sets.
///
/// Alias nodes are never handed out as `Term`: resolving an alternative id
/// returns the `Term` of the canonical node.
#[derive(Debug, Clone, Copy)]
pub struct Term<'a> {
    index: NodeIndex,
    internal: &'a TermInternal,
    data: &'a TermData,
    ontology: &'a Ontology,
}

impl<'a> Term<'a> {
    /// Constructs a new [`Term`], returns `None` for alias nodes
    pub(crate) fn new(
        ontology: &'a Ontology,
        index: NodeIndex,
        internal: &'a TermInternal,
    ) -> Option<Term<'a>> {
        Some(Term {
            index,
            internal,
            data: internal.data()?,
            ontology,
        })
    }

    pub(crate) fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the [`TermId`] of the term
    ///
    /// e.g.: `GO:0008150`
    pub fn id(&self) -> &'a TermId {
        self.internal.id()
    }

    /// Returns the name of the term
    ///
    /// e.g.: `biological_process`
    pub fn name(&self) -> &'a str {
        &self.data.name
    }

    /// Returns the namespace of the term, if specified
    pub fn namespace(&self) -> Option<&'a str> {
        self.data.namespace.as_deref()
    }

    /// Returns the free-text definition of the term, if specified
    pub fn definition(&self) -> Option<&'a str> {
        self.data.definition.as_deref()
    }

    /// Returns all synonyms of the term
    pub fn synonyms(&self) -> &'a [String] {
        &self.data.synonyms
    }

    /// Returns the alternative identifiers that forward to this term
    pub fn alt_ids(&self) -> &'a [TermId] {
        &self.data.alt_ids
    }

    /// Returns `true` if the term is marked as obsolete
    pub fn is_obsolete(&self) -> bool {
        self.data.obsolete
    }

    /// Returns `true` if the term is not obsolete
    ///
    /// Only concrete terms take part in percolation and enrichment.
    pub fn is_concrete(&self) -> bool {
        !self.data.obsolete
    }

    /// The single replacement of an obsolete term
    pub fn replaced_by(&self) -> Option<&'a TermId> {
        self.data.replaced_by.as_ref()
    }

    /// Candidate replacements of an obsolete term
    pub fn consider(&self) -> &'a [TermId] {
        &self.data.consider
    }

    /// Returns an iterator of the direct parents of the term
    pub fn parents(&self) -> Terms<'a> {
        Terms::new(self.internal.parents().clone(), self.ontology)
    }

    /// Returns an iterator of the direct children of the term
    pub fn children(&self) -> Terms<'a> {
        Terms::new(self.internal.children().clone(), self.ontology)
    }

    /// Returns `true` if the term has no parents
    pub fn is_root(&self) -> bool {
        self.internal.parents().is_empty()
    }

    /// Returns `true` if the term has no children
    pub fn is_leaf(&self) -> bool {
        self.internal.children().is_empty()
    }

    /// Returns the relation between `self` and its direct `parent`
    ///
    /// `None` if `parent` is not a direct parent of `self`
    pub fn relation_to(&self, parent: &Term) -> Option<&'a Relation> {
        self.ontology.relation(parent.index, self.index)
    }

    /// The entities directly annotated to this term
    ///
    /// `None` if no entity of that population was attached to the term.
    pub fn annotations(&self, population: Population) -> Option<&'a Entities> {
        self.ontology.state(self.index).direct(population)
    }

    /// The entities annotated to this term or any of its descendants
    ///
    /// `None` until [`Ontology::percolate`] ran for the population.
    pub fn percolated(&self, population: Population) -> Option<&'a Entities> {
        self.ontology.state(self.index).percolated(population)
    }

    /// Shortcut for [`Term::annotations`] of the background population
    pub fn background(&self) -> Option<&'a Entities> {
        self.annotations(Population::Background)
    }

    /// Shortcut for [`Term::annotations`] of the measured population
    pub fn measured(&self) -> Option<&'a Entities> {
        self.annotations(Population::Measured)
    }

    /// Shortcut for [`Term::percolated`] of the background population
    pub fn perc_background(&self) -> Option<&'a Entities> {
        self.percolated(Population::Background)
    }

    /// Shortcut for [`Term::percolated`] of the measured population
    pub fn perc_measured(&self) -> Option<&'a Entities> {
        self.percolated(Population::Measured)
    }
}

impl PartialEq for Term<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ontology, other.ontology) && self.index == other.index
    }
}

impl Eq for Term<'_> {}
