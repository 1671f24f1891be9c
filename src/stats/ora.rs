//! Over-representation analysis using Fisher's exact test
//!
//! For every term, the universe `N` (see [`Normalization`]) is split by two
//! criteria: whether an entity is abundant (`A`) and whether it was measured
//! in the term or any of its descendants (`P`, the percolated set of the
//! measured population).
//!
//! ```text
//! s11 = A ∩ P          s12 = A ∩ (N \ P)
//! s21 = (N \ A) ∩ P    s22 = (N \ A) ∩ (N \ P)
//! ```
//!
//! `P` is always the percolated *measured* set, also when the universe is
//! the background population. Entities of the term that were never measured
//! therefore count as `s22`, not as `s21`. Tools that take `P` from the
//! normalization population (e.g. the percolated background set) report
//! different tables for [`Normalization::Background`].
//!
//! Terms without any abundant entity (`s11` is empty) are skipped.
//! No multiple-testing correction is applied to the p-values.
use std::collections::HashSet;

use tracing::{debug, trace};

use crate::annotations::{Entities, EntityKey, Population};
use crate::stats::fisher::fisher_exact;
use crate::stats::{u64_from_usize, ContingencyTable, Enrichment, Normalization};
use crate::term::Term;
use crate::{OboError, OboResult, Ontology};

/// Validated input of the enrichment analysis
struct OraInput<'a> {
    abundant: HashSet<String>,
    universe: &'a Entities,
    /// `|A ∩ N|`
    abundant_in_universe: usize,
    population: Population,
}

fn ora_validator<I, K>(
    ontology: &Ontology,
    abundant: I,
    normalization: Normalization,
) -> OboResult<OraInput<'_>>
where
    I: IntoIterator<Item = K>,
    K: EntityKey,
{
    if !ontology.ora_ready() {
        return Err(OboError::OraNotReady);
    }
    let population = normalization.population();
    let universe = ontology.omega(population);
    let abundant: HashSet<String> = abundant
        .into_iter()
        .map(|key| key.entity_key().to_string())
        .collect();
    let abundant_in_universe = abundant
        .iter()
        .filter(|id| universe.contains(id.as_str()))
        .count();
    Ok(OraInput {
        abundant,
        universe,
        abundant_in_universe,
        population,
    })
}

/// Builds the contingency table of a single term and runs the test
///
/// Returns `Ok(None)` if no abundant entity is annotated to the term
fn node_ora(term: &Term, input: &OraInput) -> OboResult<Option<Enrichment>> {
    let empty = Entities::default();
    let path = term.perc_measured().unwrap_or(&empty);

    // single pass over P, entities outside of N are ignored
    let mut s11 = 0usize;
    let mut path_in_universe = 0usize;
    for id in path.iter().filter(|id| input.universe.contains(*id)) {
        path_in_universe += 1;
        if input.abundant.contains(id.as_str()) {
            s11 += 1;
        }
    }
    if s11 == 0 {
        trace!("No abundant entities in {}", term.id());
        return Ok(None);
    }

    let s12 = input.abundant_in_universe - s11;
    let s21 = path_in_universe - s11;
    let s22 = input.universe.len() - input.abundant_in_universe - s21;

    let table = ContingencyTable::new(
        u64_from_usize(s11),
        u64_from_usize(s12),
        u64_from_usize(s21),
        u64_from_usize(s22),
    );
    let (odds_ratio, pvalue) = fisher_exact(&table)?;
    Ok(Some(Enrichment::new(
        term.id().clone(),
        term.name(),
        odds_ratio,
        pvalue,
        table,
    )))
}

/// Calculates the enrichment of the `abundant` entities in every concrete term
///
/// `abundant` can be anything that identifies an entity, e.g. `&str`,
/// [`EntityId`](crate::EntityId)s or [`Entity`](crate::Entity)s.
/// Entities that are not part of the universe are ignored.
///
/// The results are in the order of the ontology's terms and are not sorted.
///
/// # Errors
///
/// [`OboError::OraNotReady`] if the ontology was not loaded and percolated
/// for both populations
///
/// # Examples
///
/// ```
/// use obogo::{Ontology, PercolateMode, Population};
/// use obogo::parser::gaf;
/// use obogo::stats::Normalization;
/// use obogo::stats::ora::score_all;
///
/// let mut ontology = Ontology::from_obo("tests/small.obo").unwrap();
/// let entities = gaf::parse("tests/small.gaf").unwrap();
/// ontology.load(Population::Background, &entities);
/// ontology.load(Population::Measured, &entities[..4]);
/// ontology.percolate(PercolateMode::Both);
///
/// let mut enrichments = score_all(&ontology, ["P00002", "P00003"], Normalization::Background).unwrap();
/// enrichments.sort_by(|a, b| a.pvalue().partial_cmp(&b.pvalue()).unwrap());
///
/// let best = enrichments.first().unwrap();
/// assert_eq!(best.name(), "translation");
/// assert_eq!(best.count(), 2);
/// ```
pub fn score_all<I, K>(
    ontology: &Ontology,
    abundant: I,
    normalization: Normalization,
) -> OboResult<Vec<Enrichment>>
where
    I: IntoIterator<Item = K>,
    K: EntityKey,
{
    let input = ora_validator(ontology, abundant, normalization)?;
    let mut res = Vec::new();
    for term in ontology.concrete_terms() {
        if let Some(enrichment) = node_ora(&term, &input)? {
            res.push(enrichment);
        }
    }
    debug!(
        "Scored {} terms for {} abundant entities, N = {} ({})",
        res.len(),
        input.abundant.len(),
        input.universe.len(),
        input.population
    );
    Ok(res)
}

/// Calculates the enrichment of the `abundant` entities in a single term
///
/// `term` is resolved with [`Ontology::resolve`]. Returns `Ok(None)` if no
/// abundant entity is annotated to the term or if `term` does not resolve
/// to a concrete term.
///
/// # Errors
///
/// - [`OboError::OraNotReady`] if the ontology was not loaded and percolated
///   for both populations
/// - [`OboError::UnknownIdentifier`] if `term` is not part of the ontology
///
/// # Examples
///
/// ```
/// use obogo::{Ontology, PercolateMode, Population};
/// use obogo::parser::gaf;
/// use obogo::stats::Normalization;
/// use obogo::stats::ora::score_one;
///
/// let mut ontology = Ontology::from_obo("tests/small.obo").unwrap();
/// let entities = gaf::parse("tests/small.gaf").unwrap();
/// ontology.load(Population::Background, &entities);
/// ontology.load(Population::Measured, &entities);
/// ontology.percolate(PercolateMode::Both);
///
/// let enrichment = score_one(&ontology, ["P00001"], "GO:0006119", Normalization::Measured)
///     .unwrap()
///     .unwrap();
/// assert_eq!(enrichment.table().total(), ontology.omega(Population::Measured).len() as u64);
///
/// // P00001 is not annotated to translation
/// assert!(score_one(&ontology, ["P00001"], "translation", Normalization::Measured)
///     .unwrap()
///     .is_none());
/// ```
pub fn score_one<I, K>(
    ontology: &Ontology,
    abundant: I,
    term: &str,
    normalization: Normalization,
) -> OboResult<Option<Enrichment>>
where
    I: IntoIterator<Item = K>,
    K: EntityKey,
{
    let input = ora_validator(ontology, abundant, normalization)?;
    match ontology.resolve(term)? {
        Some(term) if term.is_concrete() => node_ora(&term, &input),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::{Entity, EntityId};
    use crate::fixtures::chain;
    use crate::PercolateMode;

    fn entity(id: &str, terms: &[&str]) -> Entity {
        let mut entity = Entity::new(id.into(), id);
        for term in terms {
            entity.add_term(*term);
        }
        entity
    }

    fn ready_chain() -> Ontology {
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
            [entity("p1", &["GO:0000003"]), entity("p2", &["GO:0000003"])],
        );
        ontology.percolate(PercolateMode::Both);
        ontology
    }

    #[test]
    fn not_ready() {
        let mut ontology = chain();
        assert!(matches!(
            score_all(&ontology, ["p1"], Normalization::Background),
            Err(OboError::OraNotReady)
        ));
        ontology.load(Population::Background, [entity("p1", &["GO:0000003"])]);
        ontology.load(Population::Measured, [entity("p1", &["GO:0000003"])]);
        assert!(matches!(
            score_one(&ontology, ["p1"], "GO:0000003", Normalization::Background),
            Err(OboError::OraNotReady)
        ));
        ontology.percolate(PercolateMode::Both);
        assert!(score_one(&ontology, ["p1"], "GO:0000003", Normalization::Background).is_ok());
    }

    #[test]
    fn chain_scenario() {
        let ontology = ready_chain();
        let enrichment = score_one(&ontology, ["p1", "p2"], "GO:0000003", Normalization::Background)
            .unwrap()
            .unwrap();
        assert_eq!(ontology.omega(Population::Background).len(), 4);
        assert_eq!(enrichment.table().as_array(), [[2, 0], [0, 2]]);
        assert_eq!(enrichment.count(), 2);
        assert!(enrichment.odds_ratio().is_infinite());
        assert!((enrichment.pvalue() - 1.0 / 3.0).abs() < 1e-9);

        // p3 is annotated to the leaf in the background but was not measured
        let leaf = ontology.resolve("GO:0000003").unwrap().unwrap();
        assert!(leaf.perc_background().unwrap().contains("p3"));
        let [[_, _], [s21, s22]] = enrichment.table().as_array();
        assert_eq!((s21, s22), (0, 2));
    }

    #[test]
    fn chain_scenario_measured() {
        let ontology = ready_chain();
        // both measured entities are abundant and in the leaf, N = {p1, p2}
        let enrichment = score_one(&ontology, ["p1", "p2"], "GO:0000003", Normalization::Measured)
            .unwrap()
            .unwrap();
        assert_eq!(enrichment.table().as_array(), [[2, 0], [0, 0]]);
        let enrichments = score_all(&ontology, ["p1"], Normalization::Measured).unwrap();
        // leaf, mid and root contain p1, the sibling is skipped
        assert_eq!(enrichments.len(), 3);
    }

    #[test]
    fn conservation() {
        let ontology = ready_chain();
        for normalization in [Normalization::Background, Normalization::Measured] {
            let universe = ontology.omega(normalization.population());
            for enrichment in score_all(&ontology, ["p1", "p4"], normalization).unwrap() {
                let [[s11, s12], [s21, _]] = enrichment.table().as_array();
                assert_eq!(enrichment.table().total(), universe.len() as u64);
                let term = ontology.resolve(enrichment.id().as_str()).unwrap().unwrap();
                let path = term.perc_measured().unwrap();
                let in_path = path.iter().filter(|e| universe.contains(*e)).count();
                assert_eq!(s11 + s21, in_path as u64);
                assert_eq!(enrichment.count(), s11);
                assert!(s12 <= 2);
            }
        }
    }

    #[test]
    fn empty_overlap_is_skipped() {
        let ontology = ready_chain();
        assert!(score_one(&ontology, ["p1"], "GO:0000004", Normalization::Background)
            .unwrap()
            .is_none());
        assert!(score_one(&ontology, ["unknown"], "GO:0000001", Normalization::Background)
            .unwrap()
            .is_none());
        // p4 is not measured
        assert!(score_all(&ontology, ["p4"], Normalization::Background)
            .unwrap()
            .is_empty());
        let enrichments = score_all(&ontology, ["p2"], Normalization::Background).unwrap();
        let ids: Vec<&str> = enrichments.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["GO:0000001", "GO:0000002", "GO:0000003"]);
    }

    #[test]
    fn resolved_terms() {
        let ontology = ready_chain();
        // alias and replaced term score the leaf
        let by_alias = score_one(&ontology, ["p1"], "GO:0000013", Normalization::Background)
            .unwrap()
            .unwrap();
        let by_replaced = score_one(&ontology, ["p1"], "GO:0000005", Normalization::Background)
            .unwrap()
            .unwrap();
        assert_eq!(by_alias, by_replaced);
        assert_eq!(by_alias.id(), "GO:0000003");

        // obsolete terms without a single replacement are not scored
        assert!(score_one(&ontology, ["p1"], "GO:0000006", Normalization::Background)
            .unwrap()
            .is_none());
        assert!(score_one(&ontology, ["p1"], "GO:0000007", Normalization::Background)
            .unwrap()
            .is_none());
        assert!(score_one(&ontology, ["p1"], "GO:9999999", Normalization::Background).is_err());
    }

    #[test]
    fn abundant_as_entities() {
        let ontology = ready_chain();
        let abundant = vec![entity("p1", &[]), entity("p2", &[])];
        let from_entities = score_all(&ontology, &abundant, Normalization::Background).unwrap();
        let ids = vec![EntityId::from("p1"), EntityId::from("p2")];
        let from_ids = score_all(&ontology, ids, Normalization::Background).unwrap();
        assert_eq!(from_entities, from_ids);
    }
}
