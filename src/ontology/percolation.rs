use std::fmt::Display;
use std::str::FromStr;

use tracing::debug;

use crate::annotations::{Entities, Population};
use crate::term::NodeIndex;
use crate::utils::{parse_choice, Choice};
use crate::{OboResult, Ontology};

/// Selects the populations that [`Ontology::percolate`] processes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PercolateMode {
    /// Only the background population
    Background,
    /// Only the measured population
    Measured,
    /// Both populations
    #[default]
    Both,
}

impl PercolateMode {
    /// The populations covered by the mode
    pub fn populations(&self) -> &'static [Population] {
        match self {
            PercolateMode::Background => &[Population::Background],
            PercolateMode::Measured => &[Population::Measured],
            PercolateMode::Both => &Population::ALL,
        }
    }
}

impl Choice for PercolateMode {
    const PARAMETER: &'static str = "mode";
    const NAMES: &'static [&'static str] = &["background", "measured", "both"];
    const VARIANTS: &'static [Self] = &[
        PercolateMode::Background,
        PercolateMode::Measured,
        PercolateMode::Both,
    ];
}

impl FromStr for PercolateMode {
    type Err = crate::OboError;
    fn from_str(s: &str) -> OboResult<Self> {
        parse_choice(s)
    }
}

impl Display for PercolateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PercolateMode::Background => "background",
            PercolateMode::Measured => "measured",
            PercolateMode::Both => "both",
        };
        write!(f, "{name}")
    }
}

/// Percolation of annotations towards the roots
impl Ontology {
    /// Propagates the direct annotations of every term to all its ancestors
    ///
    /// After percolation, the percolated set of a term contains its own
    /// annotations and the annotations of all its descendants. The walk
    /// starts at every leaf and pushes the accumulated set to each parent.
    /// A term passes its set on only the first time it is reached and
    /// whenever its set grew, so shared ancestors of many leaves are
    /// updated incrementally and the walk always terminates.
    ///
    /// The universe of the population ([`Ontology::omega`]) is the union
    /// of the percolated sets of all roots.
    ///
    /// Running the percolation again without loading new annotations
    /// does not change any set.
    ///
    /// # Examples
    ///
    /// ```
    /// use obogo::{Ontology, PercolateMode, Population};
    /// use obogo::parser::gaf;
    ///
    /// let mut ontology = Ontology::from_obo("tests/small.obo").unwrap();
    /// let entities = gaf::parse("tests/small.gaf").unwrap();
    /// ontology.load(Population::Background, &entities);
    /// ontology.percolate(PercolateMode::Background);
    ///
    /// let root = ontology.resolve("biological_process").unwrap().unwrap();
    /// let translation = ontology.resolve("translation").unwrap().unwrap();
    /// assert!(root
    ///     .perc_background()
    ///     .unwrap()
    ///     .is_superset(translation.perc_background().unwrap()));
    /// assert!(ontology.percolated_status(Population::Background));
    /// ```
    pub fn percolate(&mut self, mode: PercolateMode) {
        for population in mode.populations() {
            self.percolate_population(*population);
        }
    }

    fn percolate_population(&mut self, population: Population) {
        let leaves: Vec<NodeIndex> = self.leaves().map(|term| term.index()).collect();
        let n_leaves = leaves.len();
        let mut stack: Vec<(NodeIndex, Entities)> = leaves
            .into_iter()
            .map(|index| (index, Entities::default()))
            .collect();
        let mut visits = 0usize;

        while let Some((index, incoming)) = stack.pop() {
            visits += 1;
            let Some(percolated) =
                self.states[index.as_usize()].merge_percolated(population, incoming)
            else {
                continue;
            };
            for parent in self.terms.get_unchecked(index).parents().iter() {
                stack.push((parent, percolated.clone()));
            }
        }

        let roots: Vec<NodeIndex> = self.roots().map(|term| term.index()).collect();
        let mut omega = Entities::default();
        for root in roots {
            if let Some(percolated) = self.states[root.as_usize()].percolated(population) {
                omega.extend(percolated.iter().cloned());
            }
        }
        debug!(
            "Percolated {}: {} visits from {} leaves, universe of {} entities",
            population,
            visits,
            n_leaves,
            omega.len()
        );
        self.omega[population.index()] = omega;
        self.percolated_status[population.index()] = true;
    }

    /// The universe of a population
    ///
    /// All entities annotated to any concrete term. Empty until
    /// [`Ontology::percolate`] ran for the population.
    pub fn omega(&self, population: Population) -> &Entities {
        &self.omega[population.index()]
    }

    /// Returns `true` if the population was percolated since it was last loaded
    pub fn percolated_status(&self, population: Population) -> bool {
        self.percolated_status[population.index()]
    }

    /// Returns `true` if both populations are loaded and percolated
    ///
    /// This is required for the enrichment analysis in [`crate::stats::ora`].
    pub fn ora_ready(&self) -> bool {
        Population::ALL
            .iter()
            .all(|population| self.load_status(*population) && self.percolated_status(*population))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::Entity;
    use crate::fixtures::chain;
    use crate::OboError;

    fn entity(id: &str, terms: &[&str]) -> Entity {
        let mut entity = Entity::new(id.into(), id);
        for term in terms {
            entity.add_term(*term);
        }
        entity
    }

    fn loaded_chain() -> Ontology {
        let mut ontology = chain();
        ontology.load(
            Population::Background,
            [
                entity("p1", &["GO:0000003"]),
                entity("p2", &["GO:0000003"]),
                entity("p3", &["GO:0000003"]),
                entity("p4", &["GO:0000002"]),
            ],
        );
        ontology.load(
            Population::Measured,
            [entity("p1", &["GO:0000003"]), entity("p2", &["GO:0000013"])],
        );
        ontology
    }

    fn ids(set: Option<&Entities>) -> Vec<&str> {
        let mut ids: Vec<&str> = set.map_or_else(Vec::new, |set| set.iter().map(|e| e.as_str()).collect());
        ids.sort_unstable();
        ids
    }

    #[test]
    fn chain_sets() {
        let mut ontology = loaded_chain();
        ontology.percolate(PercolateMode::Both);

        let root = ontology.resolve("GO:0000001").unwrap().unwrap();
        let mid = ontology.resolve("GO:0000002").unwrap().unwrap();
        let leaf = ontology.resolve("GO:0000003").unwrap().unwrap();
        let sibling = ontology.resolve("GO:0000004").unwrap().unwrap();

        assert_eq!(ids(leaf.perc_background()), vec!["p1", "p2", "p3"]);
        assert_eq!(ids(mid.perc_background()), vec!["p1", "p2", "p3", "p4"]);
        assert_eq!(ids(root.perc_background()), vec!["p1", "p2", "p3", "p4"]);
        assert_eq!(ids(mid.perc_measured()), vec!["p1", "p2"]);
        assert!(sibling.perc_background().unwrap().is_empty());

        assert_eq!(ontology.omega(Population::Background).len(), 4);
        assert_eq!(ontology.omega(Population::Measured).len(), 2);
        assert!(ontology.ora_ready());
    }

    #[test]
    fn ancestors_are_supersets() {
        let mut ontology = loaded_chain();
        ontology.percolate(PercolateMode::Both);
        for term in ontology.concrete_terms() {
            for population in Population::ALL {
                let own = term.percolated(population).unwrap();
                assert!(own.is_superset(term.annotations(population).unwrap_or(&Entities::default())));
                for parent in term.parents() {
                    assert!(parent.percolated(population).unwrap().is_superset(own));
                }
            }
        }
    }

    #[test]
    fn idempotent() {
        fn snapshot(ontology: &Ontology) -> Vec<Vec<String>> {
            ontology
                .concrete_terms()
                .map(|t| ids(t.perc_background()).into_iter().map(str::to_string).collect())
                .collect()
        }
        let mut ontology = loaded_chain();
        ontology.percolate(PercolateMode::Both);
        let before = snapshot(&ontology);
        let omega = ontology.omega(Population::Background).clone();

        ontology.percolate(PercolateMode::Both);
        assert_eq!(before, snapshot(&ontology));
        assert_eq!(&omega, ontology.omega(Population::Background));
    }

    #[test]
    fn single_population() {
        let mut ontology = loaded_chain();
        ontology.percolate(PercolateMode::Background);
        assert!(ontology.percolated_status(Population::Background));
        assert!(!ontology.percolated_status(Population::Measured));
        assert!(!ontology.ora_ready());
        let leaf = ontology.resolve("GO:0000003").unwrap().unwrap();
        assert!(leaf.perc_measured().is_none());
    }

    #[test]
    fn reload_resets_status() {
        let mut ontology = loaded_chain();
        ontology.percolate(PercolateMode::Both);
        ontology.load(Population::Measured, [entity("p9", &["GO:0000004"])]);
        assert!(!ontology.percolated_status(Population::Measured));
        assert!(ontology.omega(Population::Measured).is_empty());
        assert!(!ontology.ora_ready());

        ontology.percolate(PercolateMode::Measured);
        assert_eq!(ids(Some(ontology.omega(Population::Measured))), vec!["p9"]);
    }

    #[test]
    fn diamond() {
        let mut ontology = crate::Ontology::from_obo("tests/small.obo").unwrap();
        ontology.load(
            Population::Background,
            [entity("P1", &["GO:0006119"]), entity("P2", &["GO:0006412"])],
        );
        ontology.percolate(PercolateMode::Background);
        // reached via 0006091 and via 0044237
        let metabolic = ontology.resolve("metabolic process").unwrap().unwrap();
        assert_eq!(ids(metabolic.perc_background()), vec!["P1", "P2"]);
        let cellular = ontology.resolve("cellular process").unwrap().unwrap();
        assert_eq!(ids(cellular.perc_background()), vec!["P1", "P2"]);
        let mf = ontology.resolve("molecular_function").unwrap().unwrap();
        assert!(mf.perc_background().unwrap().is_empty());
        assert_eq!(ontology.omega(Population::Background).len(), 2);
    }

    #[test]
    fn universe_covers_all_annotations() {
        let mut ontology = crate::Ontology::from_obo("tests/small.obo").unwrap();
        let entities = crate::parser::gaf::parse("tests/small.gaf").unwrap();
        ontology.load(Population::Background, &entities);
        ontology.load(Population::Measured, &entities[..4]);
        ontology.percolate(PercolateMode::Both);

        for population in Population::ALL {
            let mut direct = Entities::default();
            for term in ontology.concrete_terms() {
                if let Some(annotations) = term.annotations(population) {
                    direct.extend(annotations.iter().cloned());
                }
            }
            assert!(!direct.is_empty());
            assert_eq!(&direct, ontology.omega(population));
        }
        // P00006 only references an unknown term
        assert!(!ontology.omega(Population::Background).contains("P00006"));
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("both".parse::<PercolateMode>().unwrap(), PercolateMode::Both);
        assert_eq!(PercolateMode::Measured.to_string(), "measured");
        assert!(matches!(
            "all".parse::<PercolateMode>(),
            Err(OboError::InvalidEnumArgument { parameter: "mode", .. })
        ));
    }
}
