use tracing::{debug, warn};

use crate::annotations::{Annotated, Entities, Population};
use crate::ontology::Resolution;
use crate::term::NodeIndex;
use crate::{OboResult, Ontology};

/// Annotation sets of a single node, one slot per [`Population`]
#[derive(Debug, Default, Clone)]
pub(crate) struct NodeState {
    direct: [Option<Entities>; 2],
    percolated: [Option<Entities>; 2],
}

impl NodeState {
    pub fn direct(&self, population: Population) -> Option<&Entities> {
        self.direct[population.index()].as_ref()
    }

    pub fn percolated(&self, population: Population) -> Option<&Entities> {
        self.percolated[population.index()].as_ref()
    }

    fn direct_mut(&mut self, population: Population) -> &mut Entities {
        self.direct[population.index()].get_or_insert_with(Entities::default)
    }

    /// Merges `incoming` into the percolated set
    ///
    /// The first merge seeds the percolated set with the direct annotations.
    /// Returns the updated set if it was created or grew, `None` otherwise.
    pub fn merge_percolated(
        &mut self,
        population: Population,
        incoming: Entities,
    ) -> Option<&Entities> {
        let slot = population.index();
        let grew = match &mut self.percolated[slot] {
            Some(percolated) => {
                let before = percolated.len();
                percolated.extend(incoming);
                percolated.len() > before
            }
            None => {
                let mut percolated = self.direct[slot].clone().unwrap_or_default();
                percolated.extend(incoming);
                self.percolated[slot] = Some(percolated);
                true
            }
        };
        if grew {
            self.percolated[slot].as_ref()
        } else {
            None
        }
    }

    fn clear(&mut self, population: Population) {
        self.direct[population.index()] = None;
        self.percolated[population.index()] = None;
    }
}

/// Statistics of a single [`Ontology::load`] call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of entities that were processed
    pub entities: usize,
    /// Number of (entity, term) pairs that were attached
    pub attached: usize,
    /// Number of term references that could not be attached
    pub skipped: usize,
}

/// Loading and clearing of annotations
impl Ontology {
    /// Attaches entities to their terms as the given [`Population`]
    ///
    /// All previous annotations of the population are removed first,
    /// including the percolated sets and the universe.
    ///
    /// Every term reference of an entity is resolved with
    /// [`Ontology::resolve_many`] semantics: alternative ids forward to the
    /// canonical term, obsolete terms to their replacement or all
    /// `consider` candidates. References that are unknown or resolve to an
    /// obsolete term without replacement are skipped with a warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use obogo::{Ontology, Population};
    /// use obogo::parser::gaf;
    ///
    /// let mut ontology = Ontology::from_obo("tests/small.obo").unwrap();
    /// let entities = gaf::parse("tests/small.gaf").unwrap();
    ///
    /// let summary = ontology.load(Population::Background, &entities);
    /// assert_eq!(summary.entities, 7);
    /// assert!(ontology.load_status(Population::Background));
    ///
    /// let translation = ontology.resolve("translation").unwrap().unwrap();
    /// assert!(translation.background().unwrap().contains("P00003"));
    /// ```
    pub fn load<I, A>(&mut self, population: Population, entities: I) -> LoadSummary
    where
        I: IntoIterator<Item = A>,
        A: Annotated,
    {
        self.clear(population);
        let mut summary = LoadSummary::default();

        for entity in entities {
            summary.entities += 1;
            for term_ref in entity.term_refs() {
                let targets = match self.resolve_index(term_ref, true) {
                    Ok(resolution) => resolution.into_group(),
                    Err(err) => {
                        warn!("Skipping annotation of {}: {}", entity.entity_id(), err);
                        summary.skipped += 1;
                        continue;
                    }
                };
                if targets.is_empty() {
                    summary.skipped += 1;
                    continue;
                }
                for index in targets.iter() {
                    let node = self.terms.get_unchecked(index);
                    if !node.is_concrete() {
                        warn!(
                            "Skipping annotation of {} to obsolete term {} ({})",
                            entity.entity_id(),
                            node.id(),
                            node.name()
                        );
                        summary.skipped += 1;
                        continue;
                    }
                    self.states[index.as_usize()]
                        .direct_mut(population)
                        .insert(entity.entity_id().clone());
                    summary.attached += 1;
                }
            }
        }

        self.load_status[population.index()] = true;
        debug!(
            "Loaded {} entities as {}: {} attached, {} skipped",
            summary.entities, population, summary.attached, summary.skipped
        );
        summary
    }

    /// Removes all annotations of the population
    ///
    /// This resets the direct and percolated sets of every term, the
    /// universe of the population and its load and percolation status.
    pub fn clear(&mut self, population: Population) {
        for state in &mut self.states {
            state.clear(population);
        }
        self.omega[population.index()].clear();
        self.load_status[population.index()] = false;
        self.percolated_status[population.index()] = false;
    }

    /// Returns `true` if entities were loaded for the population
    pub fn load_status(&self, population: Population) -> bool {
        self.load_status[population.index()]
    }

    /// The entities of a population annotated to a term, collected on demand
    ///
    /// `query` is resolved with [`Ontology::resolve`]. With `deep` the
    /// annotations of all descendants are included as well. Other than
    /// [`Term::percolated`](crate::Term::percolated) this does not require
    /// [`Ontology::percolate`], it walks the subtree on every call.
    ///
    /// Returns an empty set if `query` resolves to no single term.
    ///
    /// # Errors
    ///
    /// [`OboError::UnknownIdentifier`](crate::OboError::UnknownIdentifier)
    /// if `query` is not part of the ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use obogo::{Ontology, Population};
    /// use obogo::parser::gaf;
    ///
    /// let mut ontology = Ontology::from_obo("tests/small.obo").unwrap();
    /// let entities = gaf::parse("tests/small.gaf").unwrap();
    /// ontology.load(Population::Background, &entities);
    ///
    /// let direct = ontology
    ///     .subtree_annotations("cellular metabolic process", Population::Background, false)
    ///     .unwrap();
    /// assert_eq!(direct.len(), 1);
    ///
    /// let deep = ontology
    ///     .subtree_annotations("cellular metabolic process", Population::Background, true)
    ///     .unwrap();
    /// assert_eq!(deep.len(), 6);
    /// ```
    pub fn subtree_annotations(
        &self,
        query: &str,
        population: Population,
        deep: bool,
    ) -> OboResult<Entities> {
        let start = match self.resolve_index(query, false)? {
            Resolution::Single(index) => index,
            Resolution::Many(_) | Resolution::Nothing => return Ok(Entities::default()),
        };

        let mut entities = Entities::default();
        let mut visited = vec![false; self.states.len()];
        let mut stack: Vec<NodeIndex> = vec![start];

        while let Some(index) = stack.pop() {
            if std::mem::replace(&mut visited[index.as_usize()], true) {
                continue;
            }
            if let Some(direct) = self.states[index.as_usize()].direct(population) {
                entities.extend(direct.iter().cloned());
            }
            if deep {
                stack.extend(self.terms.get_unchecked(index).children().iter());
            }
        }
        Ok(entities)
    }
}
