//! Over-representation analysis (ORA) of ontology terms
//!
//! This module calculates the enrichment of a set of "abundant" entities
//! (e.g. up-regulated proteins of an experiment) in every term of the
//! ontology, using Fisher's exact test on a 2x2 contingency table.
//!
//! The ontology must be prepared before:
//!
//! 1. load the background population ([`Ontology::load`](crate::Ontology::load))
//! 2. load the measured population
//! 3. percolate both populations ([`Ontology::percolate`](crate::Ontology::percolate))
//!
//! See [`ora::score_all`] for an example.

use std::fmt::Display;
use std::str::FromStr;

use crate::annotations::Population;
use crate::term::TermId;
use crate::utils::{parse_choice, Choice};
use crate::OboResult;

pub mod fisher;
pub mod ora;

/// The universe used as population `N` of the enrichment analysis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Normalization {
    /// All annotated entities, e.g. the whole proteome
    #[default]
    Background,
    /// Only the entities measured in the experiment
    Measured,
}

impl Normalization {
    /// The population whose universe and percolated sets are used
    pub fn population(&self) -> Population {
        match self {
            Normalization::Background => Population::Background,
            Normalization::Measured => Population::Measured,
        }
    }
}

impl Choice for Normalization {
    const PARAMETER: &'static str = "normalization";
    const NAMES: &'static [&'static str] = &["background", "measured"];
    const VARIANTS: &'static [Self] = &[Normalization::Background, Normalization::Measured];
}

impl FromStr for Normalization {
    type Err = crate::OboError;
    fn from_str(s: &str) -> OboResult<Self> {
        parse_choice(s)
    }
}

/// A 2x2 contingency table
///
/// ```text
///              | in term | not in term
/// -------------+---------+------------
/// abundant     |   s11   |   s12
/// not abundant |   s21   |   s22
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContingencyTable {
    s11: u64,
    s12: u64,
    s21: u64,
    s22: u64,
}

impl ContingencyTable {
    /// Constructs a new table from its four cells
    pub fn new(s11: u64, s12: u64, s21: u64, s22: u64) -> Self {
        Self { s11, s12, s21, s22 }
    }

    /// The table as rows, `[[s11, s12], [s21, s22]]`
    pub fn as_array(&self) -> [[u64; 2]; 2] {
        [[self.s11, self.s12], [self.s21, self.s22]]
    }

    /// The sum of all cells
    pub fn total(&self) -> u64 {
        self.s11 + self.s12 + self.s21 + self.s22
    }
}

impl Display for ContingencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[[{}, {}], [{}, {}]]",
            self.s11, self.s12, self.s21, self.s22
        )
    }
}

/// The enrichment of abundant entities in a single term
///
/// [`Enrichment`] is returned from [`ora::score_all`] and [`ora::score_one`].
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    id: TermId,
    name: String,
    count: u64,
    odds_ratio: f64,
    pvalue: f64,
    table: ContingencyTable,
}

impl Enrichment {
    /// Constructs an `Enrichment` from the results of Fisher's exact test
    pub fn new(id: TermId, name: &str, odds_ratio: f64, pvalue: f64, table: ContingencyTable) -> Self {
        Self {
            id,
            name: name.to_string(),
            count: table.s11,
            odds_ratio,
            pvalue,
            table,
        }
    }

    /// Returns the [`TermId`] of the term
    pub fn id(&self) -> &TermId {
        &self.id
    }

    /// Returns the name of the term
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of abundant entities annotated to the term
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the sample odds ratio of the contingency table
    ///
    /// `+inf` if `s12` or `s21` is zero
    pub fn odds_ratio(&self) -> f64 {
        self.odds_ratio
    }

    /// Returns the two-sided p-value of Fisher's exact test
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// Returns the contingency table
    pub fn table(&self) -> &ContingencyTable {
        &self.table
    }

    /// Returns all values as a tuple of `(id, name, count, odds_ratio, pvalue, table)`
    pub fn into_parts(self) -> (TermId, String, u64, f64, f64, [[u64; 2]; 2]) {
        (
            self.id,
            self.name,
            self.count,
            self.odds_ratio,
            self.pvalue,
            self.table.as_array(),
        )
    }
}

/// We have to frequently do divisions starting with u64 values
/// and need to return f64 values. To ensure some kind of safety
/// we use this method to panic in case of overflows.
fn f64_from_u64(n: u64) -> f64 {
    let intermediate: u32 = n
        .try_into()
        .expect("cannot safely create f64 from large u64");
    intermediate.into()
}

/// Same as [`f64_from_u64`] for set sizes
fn u64_from_usize(n: usize) -> u64 {
    n.try_into().expect("usize always fits into u64")
}
