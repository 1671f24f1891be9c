use core::fmt::Debug;
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::annotations::Entities;
use crate::parser::TermRecord;
use crate::term::internal::{NodeKind, TermData, TermInternal};
use crate::term::{is_term_id, NodeIndex, Relation, Term, TermGroup, TermId, Terms};
use crate::{OboError, OboResult};

mod annotation;
pub mod builder;
mod percolation;
mod termarena;

pub(crate) use annotation::NodeState;
pub use annotation::LoadSummary;
use builder::{Builder, BuilderConfig};
pub use percolation::PercolateMode;
use termarena::Arena;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` is the main interface of the `obogo` crate and holds all data
///
/// The [`Ontology`] contains all [`Term`]s, alias nodes for alternative
/// identifiers, the `is_a` (and other configured) relationships and the
/// background and measured annotation sets of each term.
///
/// # Examples
///
/// ```
/// use obogo::Ontology;
///
/// let ontology = Ontology::from_obo("tests/small.obo").unwrap();
///
/// // terms can be looked up by id or by name
/// let term = ontology.resolve("GO:0006412").unwrap().unwrap();
/// assert_eq!(term.name(), "translation");
/// let term = ontology.resolve("translation").unwrap().unwrap();
/// assert_eq!(term.id(), "GO:0006412");
///
/// // alternative ids forward to the canonical term
/// let term = ontology.resolve("GO:0006416").unwrap().unwrap();
/// assert_eq!(term.id(), "GO:0006412");
///
/// // unknown identifiers are an error
/// assert!(ontology.resolve("GO:9999999").is_err());
///
/// for term in &ontology {
///     // do something with term
///     println!("{} | {}", term.id(), term.name());
/// }
/// ```
///
/// # Construction
///
/// An ontology is created from an OBO file with [`Ontology::from_obo`] or
/// [`Ontology::from_obo_with`], or from in-memory [`TermRecord`]s with
/// [`Ontology::from_records`]. For full control, use the [`Builder`].
///
/// # Layout
///
/// Every node of the ontology is either a term or an alias. Aliases only
/// point to their canonical term, they have no edges and no annotations.
/// Obsolete terms are part of the ontology so that old references can be
/// resolved, but they are not connected to the hierarchy.
///
/// ```mermaid
/// erDiagram
///     ONTOLOGY ||--|{ TERM : contains
///     ONTOLOGY ||--o{ ALIAS : contains
///     ALIAS }o--|| TERM : alias_of
///     TERM ||--o{ TERM : is_a
///     TERM }o--o{ ENTITY : annotated
///     TERM {
///         TermId id
///         str name
///         bool obsolete
///         TermId replaced_by
///         TermIds consider
///         Entities background
///         Entities measured
///     }
///     ALIAS {
///         TermId id
///     }
///     ENTITY {
///         EntityId id
///         str name
///     }
/// ```
///
/// # Workflow for enrichment analysis
///
/// ```mermaid
/// graph LR
///     A[from_obo] --> B["load(Background)"]
///     B --> C["load(Measured)"]
///     C --> D["percolate(Both)"]
///     D --> E[stats::ora::score_all]
/// ```
pub struct Ontology {
    terms: Arena,
    names: HashMap<String, NodeIndex>,
    n_terms: usize,
    states: Vec<NodeState>,
    omega: [Entities; 2],
    load_status: [bool; 2],
    percolated_status: [bool; 2],
}

impl Default for Ontology {
    fn default() -> Self {
        Self {
            terms: Arena::default(),
            names: HashMap::default(),
            n_terms: 0,
            states: Vec::with_capacity(crate::DEFAULT_NUM_TERMS),
            omega: [Entities::default(), Entities::default()],
            load_status: [false; 2],
            percolated_status: [false; 2],
        }
    }
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ontology with {} terms and {} aliases",
            self.n_terms,
            self.terms.len() - self.n_terms
        )
    }
}

/// Outcome of resolving a node
pub(crate) enum Resolution {
    Single(NodeIndex),
    Many(TermGroup),
    Nothing,
}

impl Resolution {
    pub fn into_group(self) -> TermGroup {
        match self {
            Resolution::Single(index) => [index].into_iter().collect(),
            Resolution::Many(group) => group,
            Resolution::Nothing => TermGroup::new(),
        }
    }
}

/// Public API of the Ontology
///
/// Those methods are all safe to use
impl Ontology {
    /// Initialize the [`Ontology`] from an OBO file, using the default [`BuilderConfig`]
    ///
    /// # Errors
    ///
    /// - [`OboError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`OboError::MalformedRecord`]: A stanza can't be tokenized or has an invalid id
    /// - [`OboError::DuplicateTerm`]: A term id is defined twice
    ///
    /// # Examples
    ///
    /// ```
    /// use obogo::Ontology;
    ///
    /// let ontology = Ontology::from_obo("tests/small.obo").unwrap();
    /// assert_eq!(ontology.len(), 12);
    /// ```
    pub fn from_obo<P: AsRef<Path>>(path: P) -> OboResult<Self> {
        Self::from_obo_with(path, &BuilderConfig::default())
    }

    /// Initialize the [`Ontology`] from an OBO file
    ///
    /// # Errors
    ///
    /// See [`Ontology::from_obo`]
    ///
    /// # Examples
    ///
    /// ```
    /// use obogo::{BuilderConfig, Ontology};
    ///
    /// let config = BuilderConfig::default()
    ///     .keep_obsolete(false)
    ///     .namespace("molecular_function");
    /// let ontology = Ontology::from_obo_with("tests/small.obo", &config).unwrap();
    /// assert_eq!(ontology.len(), 2);
    /// ```
    pub fn from_obo_with<P: AsRef<Path>>(path: P, config: &BuilderConfig) -> OboResult<Self> {
        let mut builder = Builder::with_config(config.clone());
        for record in crate::parser::obo::records(path)? {
            builder.add_record(&record?)?;
        }
        let ontology = builder.terms_complete().connect_all_terms().build();
        debug!("Loaded {:?}", ontology);
        Ok(ontology)
    }

    /// Initialize the [`Ontology`] from term records, using the default [`BuilderConfig`]
    ///
    /// # Errors
    ///
    /// - [`OboError::MalformedRecord`]: A record has no or an invalid id
    /// - [`OboError::DuplicateTerm`]: A term id is defined twice
    pub fn from_records<I: IntoIterator<Item = TermRecord>>(records: I) -> OboResult<Self> {
        let mut builder = Builder::new();
        for record in records {
            builder.add_record(&record)?;
        }
        Ok(builder.terms_complete().connect_all_terms().build())
    }

    /// Returns the number of terms (obsolete included, aliases excluded)
    pub fn len(&self) -> usize {
        self.n_terms
    }

    /// Returns `true` if the ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.n_terms == 0
    }

    /// Returns the number of parent-child relationships
    pub fn n_relations(&self) -> usize {
        self.terms.n_edges()
    }

    /// Returns an iterator of all terms (obsolete included, aliases excluded)
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns the [`Term`] for an identifier or name
    ///
    /// `query` is treated as an identifier if it has the shape `PREFIX:digits`
    /// (see [`crate::term::is_term_id`]), otherwise it's looked up as a term name.
    ///
    /// - Alternative ids resolve to their canonical term
    /// - Obsolete terms with a `replaced_by` resolve to the replacement
    /// - Obsolete terms with `consider` candidates resolve to `None`
    ///   and emit a warning, use [`Ontology::resolve_many`] for those
    /// - Obsolete terms without any replacement resolve to themselves
    ///   and emit a warning
    ///
    /// # Errors
    ///
    /// [`OboError::UnknownIdentifier`] if `query` is not part of the ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use obogo::Ontology;
    ///
    /// let ontology = Ontology::from_obo("tests/small.obo").unwrap();
    ///
    /// // GO:0003783 is obsolete and replaced by GO:0006119
    /// let term = ontology.resolve("GO:0003783").unwrap().unwrap();
    /// assert_eq!(term.id(), "GO:0006119");
    ///
    /// // GO:0000005 is obsolete with two replacement candidates
    /// assert!(ontology.resolve("GO:0000005").unwrap().is_none());
    /// ```
    pub fn resolve(&self, query: &str) -> OboResult<Option<Term<'_>>> {
        match self.resolve_index(query, false)? {
            Resolution::Single(index) => Ok(self.term_at(index)),
            Resolution::Many(_) | Resolution::Nothing => Ok(None),
        }
    }

    /// Returns all [`Term`]s an identifier or name resolves to
    ///
    /// Same as [`Ontology::resolve`], but obsolete terms with `consider`
    /// candidates resolve to all candidates (each of them resolved in turn).
    ///
    /// # Errors
    ///
    /// [`OboError::UnknownIdentifier`] if `query` or one of the candidates
    /// is not part of the ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use obogo::Ontology;
    ///
    /// let ontology = Ontology::from_obo("tests/small.obo").unwrap();
    /// let terms = ontology.resolve_many("GO:0000005").unwrap();
    /// assert_eq!(terms.len(), 2);
    /// ```
    pub fn resolve_many(&self, query: &str) -> OboResult<Terms<'_>> {
        let group = self.resolve_index(query, true)?.into_group();
        Ok(Terms::new(group, self))
    }

    /// Returns the direct children of all terms that `query` resolves to
    ///
    /// # Errors
    ///
    /// See [`Ontology::resolve_many`]
    pub fn successors(&self, query: &str) -> OboResult<Terms<'_>> {
        let group = self.resolve_index(query, true)?.into_group();
        let children = group.iter().fold(TermGroup::new(), |acc, index| {
            &acc | self.terms.get_unchecked(index).children()
        });
        Ok(Terms::new(children, self))
    }

    /// Returns the direct parents of all terms that `query` resolves to
    ///
    /// # Errors
    ///
    /// See [`Ontology::resolve_many`]
    ///
    /// # Examples
    ///
    /// ```
    /// use obogo::Ontology;
    ///
    /// let ontology = Ontology::from_obo("tests/small.obo").unwrap();
    /// let parents: Vec<String> = ontology
    ///     .predecessors("cellular metabolic process")
    ///     .unwrap()
    ///     .map(|term| term.name().to_string())
    ///     .collect();
    /// assert_eq!(parents.len(), 2);
    /// assert!(parents.contains(&"metabolic process".to_string()));
    /// assert!(parents.contains(&"cellular process".to_string()));
    /// ```
    pub fn predecessors(&self, query: &str) -> OboResult<Terms<'_>> {
        let group = self.resolve_index(query, true)?.into_group();
        let parents = group.iter().fold(TermGroup::new(), |acc, index| {
            &acc | self.terms.get_unchecked(index).parents()
        });
        Ok(Terms::new(parents, self))
    }

    /// Returns the [`Term`] with the exact name `name`
    ///
    /// Other than [`Ontology::resolve`], obsolete terms are returned as they are.
    pub fn term_by_name(&self, name: &str) -> Option<Term<'_>> {
        self.names
            .get(name)
            .and_then(|index| self.term_at(*index))
    }

    /// Returns an iterator of all non-obsolete terms
    pub fn concrete_terms(&self) -> impl Iterator<Item = Term<'_>> {
        self.iter().filter(Term::is_concrete)
    }

    /// Returns an iterator of all non-obsolete terms without parents
    pub fn roots(&self) -> impl Iterator<Item = Term<'_>> {
        self.concrete_terms().filter(Term::is_root)
    }

    /// Returns an iterator of all non-obsolete terms without children
    pub fn leaves(&self) -> impl Iterator<Item = Term<'_>> {
        self.concrete_terms().filter(Term::is_leaf)
    }

    /// Adds a parent -> child relationship
    ///
    /// Both ids can be alternative ids, the edge is added between the
    /// canonical terms. Edges that would involve an obsolete term or
    /// connect a term to itself are skipped with a warning.
    ///
    /// Returns `true` if a new edge was added.
    ///
    /// # Errors
    ///
    /// [`OboError::UnknownIdentifier`] if one of the ids is not in the ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use obogo::{Ontology, Relation};
    ///
    /// let mut ontology = Ontology::from_obo("tests/small.obo").unwrap();
    /// let added = ontology
    ///     .add_parent("GO:0009987", "GO:0006412", Relation::IsA)
    ///     .unwrap();
    /// assert!(added);
    /// assert_eq!(ontology.predecessors("GO:0006412").unwrap().len(), 2);
    /// ```
    pub fn add_parent(&mut self, parent: &str, child: &str, relation: Relation) -> OboResult<bool> {
        let parent_idx = self.canonical_index(parent)?;
        let child_idx = self.canonical_index(child)?;
        if parent_idx == child_idx {
            warn!("Skipping self-relation of {}", parent);
            return Ok(false);
        }
        if !self.terms.get_unchecked(parent_idx).is_concrete()
            || !self.terms.get_unchecked(child_idx).is_concrete()
        {
            warn!(
                "Skipping relation {} -> {}: obsolete terms are not part of the hierarchy",
                parent, child
            );
            return Ok(false);
        }
        Ok(self.terms.connect(parent_idx, child_idx, relation))
    }

    /// Returns the code to create a `Mermaid` flow diagram
    ///
    /// This is meant to be used with small ontologies.
    pub fn as_mermaid(&self) -> String {
        let mut code = String::new();
        code.push_str("graph TD\n");
        for term in self.concrete_terms() {
            code.push_str(&format!(
                "{}[\"{}\n{}\"]\n",
                term.id(),
                term.id(),
                term.name()
            ));
            for child in term.children() {
                code.push_str(&format!("{} --> {}\n", term.id(), child.id()));
            }
        }
        code
    }
}

/// Crate-only functions for building and navigating the ontology
impl Ontology {
    /// Inserts a term and alias nodes for its alternative ids
    ///
    /// The record's relationships are not evaluated here.
    ///
    /// # Errors
    ///
    /// - [`OboError::MalformedRecord`]: invalid or missing id, repeated single-value field
    /// - [`OboError::DuplicateTerm`]: a term with the same id is already present
    pub(crate) fn insert_record(&mut self, record: &TermRecord) -> OboResult<NodeIndex> {
        let id = TermId::try_from(record.single("id")?)?;
        let data = TermData::try_from_record(record)?;
        let alt_ids = data.alt_ids.clone();
        let name = data.name.clone();

        let index = match self.terms.index_of(id.as_str()) {
            None => self.insert_node(TermInternal::new(id.clone(), data)),
            Some(existing) => {
                let Some(canonical) = self.terms.get_unchecked(existing).alias_of() else {
                    return Err(OboError::DuplicateTerm(id.to_string()));
                };
                warn!(
                    "{} was an alternative id of {}, now replaced by its own term",
                    id,
                    self.terms.get_unchecked(canonical).id()
                );
                self.terms
                    .replace(existing, TermInternal::new(id.clone(), data));
                existing
            }
        };
        self.n_terms += 1;

        if !name.is_empty() {
            if let Some(previous) = self.names.insert(name.clone(), index) {
                warn!(
                    "Name \"{}\" of {} was already used by {}",
                    name,
                    id,
                    self.terms.get_unchecked(previous).id()
                );
            }
        }

        for alt_id in alt_ids {
            if alt_id == id {
                continue;
            }
            match self.terms.index_of(alt_id.as_str()) {
                None => {
                    self.insert_node(TermInternal::alias(alt_id, index));
                }
                Some(existing) => {
                    warn!(
                        "Alternative id {} of {} is already used by {}",
                        alt_id,
                        id,
                        self.terms.get_unchecked(existing).id()
                    );
                }
            }
        }
        Ok(index)
    }

    fn insert_node(&mut self, node: TermInternal) -> NodeIndex {
        self.states.push(NodeState::default());
        self.terms.insert(node)
    }

    /// Returns the `Term` at `index`, `None` for alias nodes
    pub(crate) fn term_at(&self, index: NodeIndex) -> Option<Term<'_>> {
        Term::new(self, index, self.terms.get(index)?)
    }

    pub(crate) fn state(&self, index: NodeIndex) -> &NodeState {
        &self.states[index.as_usize()]
    }

    pub(crate) fn relation(&self, parent: NodeIndex, child: NodeIndex) -> Option<&Relation> {
        self.terms.relation(parent, child)
    }

    /// Finds the node of an id or name, without any forwarding
    fn lookup(&self, query: &str) -> OboResult<NodeIndex> {
        let index = if is_term_id(query) {
            self.terms.index_of(query)
        } else {
            self.names.get(query).copied()
        };
        index.ok_or_else(|| OboError::UnknownIdentifier(query.to_string()))
    }

    /// Finds the node of an id or name and follows aliases, but not obsolete forwarding
    fn canonical_index(&self, query: &str) -> OboResult<NodeIndex> {
        let index = self.lookup(query)?;
        Ok(self.terms.get_unchecked(index).alias_of().unwrap_or(index))
    }

    pub(crate) fn resolve_index(&self, query: &str, many: bool) -> OboResult<Resolution> {
        let index = self.lookup(query)?;
        self.resolve_node(index, many, &mut Vec::new())
    }

    /// Follows aliases and obsolete forwarding, starting at `index`
    ///
    /// `trail` holds the nodes visited on the current forwarding chain
    /// and stops cyclic `replaced_by` chains.
    fn resolve_node(
        &self,
        index: NodeIndex,
        many: bool,
        trail: &mut Vec<NodeIndex>,
    ) -> OboResult<Resolution> {
        let node = self.terms.get_unchecked(index);
        if trail.contains(&index) {
            warn!("Circular replacement of {}, unable to resolve", node.id());
            return Ok(Resolution::Nothing);
        }
        trail.push(index);

        let data = match node.kind() {
            NodeKind::Alias(canonical) => return self.resolve_node(*canonical, many, trail),
            NodeKind::Term(data) => data,
        };

        if !data.obsolete {
            return Ok(Resolution::Single(index));
        }

        if let Some(replacement) = &data.replaced_by {
            let next = self.lookup(replacement.as_str())?;
            return self.resolve_node(next, many, trail);
        }

        if data.consider.is_empty() {
            warn!(
                "{} is an obsolete term with no valid term to replace it",
                node.id()
            );
            return Ok(Resolution::Single(index));
        }

        if !many {
            warn!(
                "{} is an obsolete term, consider one of: {}",
                node.id(),
                data.consider
                    .iter()
                    .map(TermId::as_str)
                    .collect::<Vec<&str>>()
                    .join(", ")
            );
            return Ok(Resolution::Nothing);
        }

        let mut group = TermGroup::new();
        for candidate in &data.consider {
            let next = self.lookup(candidate.as_str())?;
            let resolved = self.resolve_node(next, many, &mut trail.clone())?;
            for idx in resolved.into_group().iter() {
                group.insert(idx);
            }
        }
        Ok(Resolution::Many(group))
    }
}

/// Iterator of all [`Term`]s of the ontology
pub struct Iter<'a> {
    inner: std::ops::Range<usize>,
    ontology: &'a Ontology,
}

impl<'a> std::iter::Iterator for Iter<'a> {
    type Item = Term<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        for index in self.inner.by_ref() {
            if let Some(term) = self.ontology.term_at(NodeIndex::from(index)) {
                return Some(term);
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = Term<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: 0..self.terms.len(),
            ontology: self,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::{chain, record};

    #[test]
    fn counts() {
        let ontology = chain();
        assert_eq!(ontology.len(), 7);
        assert!(!ontology.is_empty());
        assert_eq!(ontology.iter().count(), 7);
        assert_eq!(ontology.concrete_terms().count(), 4);
        assert_eq!(ontology.n_relations(), 3);
        assert_eq!(
            format!("{:?}", ontology),
            "Ontology with 7 terms and 3 aliases"
        );
    }

    #[test]
    fn roots_and_leaves() {
        let ontology = chain();
        let roots: Vec<&str> = ontology.roots().map(|t| t.id().as_str()).collect();
        assert_eq!(roots, vec!["GO:0000001"]);
        let mut leaves: Vec<&str> = ontology.leaves().map(|t| t.id().as_str()).collect();
        leaves.sort_unstable();
        assert_eq!(leaves, vec!["GO:0000003", "GO:0000004"]);
    }

    #[test]
    fn resolve_by_id_and_name() {
        let ontology = chain();
        let by_id = ontology.resolve("GO:0000002").unwrap().unwrap();
        let by_name = ontology.resolve("mid").unwrap().unwrap();
        assert_eq!(by_id, by_name);
        assert_eq!(by_id.name(), "mid");
    }

    #[test]
    fn resolve_alias() {
        let ontology = chain();
        let leaf = ontology.resolve("GO:0000003").unwrap().unwrap();
        assert_eq!(ontology.resolve("GO:0000013").unwrap().unwrap(), leaf);
        assert_eq!(ontology.resolve("GO:0000023").unwrap().unwrap(), leaf);
        assert_eq!(leaf.alt_ids().len(), 2);
    }

    #[test]
    fn resolve_obsolete() {
        let ontology = chain();

        // replaced_by
        let term = ontology.resolve("GO:0000005").unwrap().unwrap();
        assert_eq!(term.id(), "GO:0000003");
        assert_eq!(ontology.resolve_many("GO:0000005").unwrap().len(), 1);

        // consider
        assert!(ontology.resolve("GO:0000006").unwrap().is_none());
        let mut ids: Vec<&str> = ontology
            .resolve_many("GO:0000006")
            .unwrap()
            .map(|t| t.id().as_str())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["GO:0000003", "GO:0000004"]);

        // neither
        let term = ontology.resolve("GO:0000007").unwrap().unwrap();
        assert_eq!(term.id(), "GO:0000007");
        assert!(term.is_obsolete());
    }

    #[test]
    fn resolve_unknown() {
        let ontology = chain();
        assert!(matches!(
            ontology.resolve("GO:9999999"),
            Err(OboError::UnknownIdentifier(_))
        ));
        assert!(matches!(
            ontology.resolve("no such term"),
            Err(OboError::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn multi_hop_replacement() {
        let ontology = Ontology::from_records(vec![
            record(&[("id", "GO:0000001"), ("name", "target")]),
            record(&[
                ("id", "GO:0000002"),
                ("is_obsolete", "true"),
                ("replaced_by", "GO:0000001"),
            ]),
            record(&[
                ("id", "GO:0000003"),
                ("is_obsolete", "true"),
                ("replaced_by", "GO:0000002"),
            ]),
        ])
        .unwrap();
        let term = ontology.resolve("GO:0000003").unwrap().unwrap();
        assert_eq!(term.id(), "GO:0000001");
    }

    #[test]
    fn obsolete_field_without_true() {
        let ontology = Ontology::from_records(vec![
            record(&[("id", "GO:0000001"), ("name", "target")]),
            record(&[
                ("id", "GO:0000002"),
                ("is_obsolete", "false"),
                ("replaced_by", "GO:0000001"),
                ("is_a", "GO:0000001"),
            ]),
        ])
        .unwrap();
        let term = ontology.resolve("GO:0000002").unwrap().unwrap();
        assert_eq!(term.id(), "GO:0000001");
        assert_eq!(ontology.concrete_terms().count(), 1);
        assert_eq!(ontology.n_relations(), 0);
    }

    #[test]
    fn circular_replacement() {
        let ontology = Ontology::from_records(vec![
            record(&[
                ("id", "GO:0000001"),
                ("is_obsolete", "true"),
                ("replaced_by", "GO:0000002"),
            ]),
            record(&[
                ("id", "GO:0000002"),
                ("is_obsolete", "true"),
                ("replaced_by", "GO:0000001"),
            ]),
        ])
        .unwrap();
        assert!(ontology.resolve("GO:0000001").unwrap().is_none());
        assert!(ontology.resolve_many("GO:0000002").unwrap().is_empty());
    }

    #[test]
    fn successors_and_predecessors() {
        let ontology = chain();
        let children: Vec<&str> = ontology
            .successors("GO:0000001")
            .unwrap()
            .map(|t| t.id().as_str())
            .collect();
        assert_eq!(children, vec!["GO:0000002", "GO:0000004"]);

        // the alias forwards to the leaf
        let parents: Vec<&str> = ontology
            .predecessors("GO:0000013")
            .unwrap()
            .map(|t| t.id().as_str())
            .collect();
        assert_eq!(parents, vec!["GO:0000002"]);

        // union over all consider candidates
        let parents: Vec<&str> = ontology
            .predecessors("GO:0000006")
            .unwrap()
            .map(|t| t.id().as_str())
            .collect();
        assert_eq!(parents, vec!["GO:0000001", "GO:0000002"]);

        assert!(ontology.successors("GO:0000003").unwrap().is_empty());
    }

    #[test]
    fn relations() {
        let ontology = chain();
        let mid = ontology.resolve("GO:0000002").unwrap().unwrap();
        let leaf = ontology.resolve("GO:0000003").unwrap().unwrap();
        assert_eq!(leaf.relation_to(&mid), Some(&Relation::IsA));
        assert!(mid.relation_to(&leaf).is_none());
    }

    #[test]
    fn add_parent_rules() {
        let mut ontology = chain();
        // alias is connected via its canonical term
        assert!(ontology
            .add_parent("GO:0000004", "GO:0000013", Relation::from("part_of"))
            .unwrap());
        let leaf = ontology.resolve("GO:0000003").unwrap().unwrap();
        assert_eq!(leaf.parents().len(), 2);

        // no edges to obsolete terms or to itself
        assert!(!ontology
            .add_parent("GO:0000007", "GO:0000003", Relation::IsA)
            .unwrap());
        assert!(!ontology
            .add_parent("GO:0000003", "GO:0000003", Relation::IsA)
            .unwrap());
        assert!(ontology
            .add_parent("GO:9999999", "GO:0000003", Relation::IsA)
            .is_err());
    }

    #[test]
    fn duplicate_term() {
        let res = Ontology::from_records(vec![
            record(&[("id", "GO:0000001"), ("name", "a")]),
            record(&[("id", "GO:0000001"), ("name", "b")]),
        ]);
        assert!(matches!(res, Err(OboError::DuplicateTerm(_))));
    }

    #[test]
    fn term_replaces_alias() {
        let ontology = Ontology::from_records(vec![
            record(&[("id", "GO:0000001"), ("name", "a"), ("alt_id", "GO:0000002")]),
            record(&[("id", "GO:0000002"), ("name", "b")]),
        ])
        .unwrap();
        assert_eq!(ontology.len(), 2);
        assert_eq!(ontology.resolve("GO:0000002").unwrap().unwrap().name(), "b");
    }

    #[test]
    fn names_of_obsolete_terms() {
        let ontology = chain();
        let term = ontology.term_by_name("obsolete replaced").unwrap();
        assert_eq!(term.id(), "GO:0000005");
        let resolved = ontology.resolve("obsolete replaced").unwrap().unwrap();
        assert_eq!(resolved.id(), "GO:0000003");
    }

    #[test]
    fn mermaid() {
        let ontology = chain();
        let code = ontology.as_mermaid();
        assert!(code.starts_with("graph TD\n"));
        assert!(code.contains("GO:0000001 --> GO:0000002\n"));
        assert!(!code.contains("GO:0000005"));
    }
}
