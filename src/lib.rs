#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

use thiserror::Error;

pub mod annotations;
pub mod parser;
pub mod stats;
pub mod term;
mod ontology;
mod utils;

pub use annotations::{Annotated, Entities, Entity, EntityId, EntityKey, Population};
pub use ontology::builder::{Builder, BuilderConfig};
pub use ontology::{LoadSummary, Ontology, PercolateMode};
pub use parser::TermRecord;
pub use term::{Relation, Term, TermId};

const DEFAULT_NUM_PARENTS: usize = 8;
const DEFAULT_NUM_TERMS: usize = 50_000;
const DEFAULT_NUM_ENTITIES: usize = 20_000;

/// Error type of all fallible operations of the crate
#[derive(Error, Debug)]
pub enum OboError {
    /// The identifier or name is not part of the ontology
    #[error("unknown identifier or name: {0}")]
    UnknownIdentifier(String),
    /// A term record cannot be tokenized or lacks a required field
    #[error("malformed term record: {0}")]
    MalformedRecord(String),
    /// The term identifier was inserted twice
    #[error("term {0} is already present")]
    DuplicateTerm(String),
    /// Enrichment was requested before both populations were loaded and percolated
    #[error("ontology not ready for enrichment analysis")]
    OraNotReady,
    /// A string value outside of the allowed set of choices
    #[error("parameter {parameter}: \"{value}\" is not one of {allowed:?}")]
    InvalidEnumArgument {
        /// Name of the parameter
        parameter: &'static str,
        /// The rejected value
        value: String,
        /// All accepted values
        allowed: &'static [&'static str],
    },
    /// Unable to open or read a file
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// Input data in an annotation source is invalid
    #[error("invalid data: {0}")]
    InvalidInput(String),
    /// A 2x2 table with inconsistent margins
    #[error("invalid contingency table")]
    InvalidContingencyTable,
}

/// Shortcut for `Result<T, OboError>`
pub type OboResult<T> = Result<T, OboError>;
