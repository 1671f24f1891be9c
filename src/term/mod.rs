//! [`Term`]s are the nodes of the ontology, identified by their [`TermId`]
//!
//! Terms are connected to each other by directed relationships (by default
//! only `is_a`) from the more general parent to the more specific child.
//! A term can have many parents, the ontology is a DAG and not a tree.

use core::fmt::Debug;
use std::borrow::Borrow;
use std::fmt::Display;

use crate::{OboError, OboResult};

mod group;
pub(crate) mod internal;
mod oboterm;

pub(crate) use group::TermGroup;
pub use group::Terms;
pub use oboterm::Term;

/// Returns `true` if `value` has the shape of a term identifier (`PREFIX:digits`)
///
/// Everything else is treated as a term name by the resolver.
///
/// # Examples
///
/// ```
/// use obogo::term::is_term_id;
///
/// assert!(is_term_id("GO:0008150"));
/// assert!(is_term_id("HP:0000001"));
/// assert!(!is_term_id("biological_process"));
/// assert!(!is_term_id("GO:"));
/// assert!(!is_term_id("GO:00a1"));
/// ```
pub fn is_term_id(value: &str) -> bool {
    let Some((prefix, accession)) = value.split_once(':') else {
        return false;
    };
    let mut prefix_chars = prefix.chars();
    match prefix_chars.next() {
        Some(c) if c.is_ascii_alphabetic() => (),
        _ => return false,
    }
    prefix_chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !accession.is_empty()
        && accession.bytes().all(|b| b.is_ascii_digit())
}

/// The unique identifier of a term, e.g. `GO:0008150`
///
/// The identifier is validated on construction, so every `TermId`
/// has the shape `PREFIX:digits`.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId {
    inner: Box<str>,
}

impl TermId {
    /// The prefix of the identifier, e.g. `GO`
    pub fn prefix(&self) -> &str {
        self.inner
            .split_once(':')
            .map(|(prefix, _)| prefix)
            .unwrap_or_default()
    }

    /// The local (numerical) part of the identifier, e.g. `0008150`
    pub fn accession(&self) -> &str {
        self.inner
            .split_once(':')
            .map(|(_, accession)| accession)
            .unwrap_or_default()
    }

    /// The full identifier as `str`
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl TryFrom<&str> for TermId {
    type Error = OboError;
    fn try_from(value: &str) -> OboResult<Self> {
        if is_term_id(value) {
            Ok(TermId {
                inner: value.into(),
            })
        } else {
            Err(OboError::MalformedRecord(format!(
                "\"{value}\" is not a valid term identifier"
            )))
        }
    }
}

impl TryFrom<String> for TermId {
    type Error = OboError;
    fn try_from(value: String) -> OboResult<Self> {
        TermId::try_from(value.as_str())
    }
}

impl Borrow<str> for TermId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({})", self)
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        &*self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        &*self.inner == *other
    }
}

/// The type of a parent -> child connection
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The child is a more specific kind of the parent
    #[default]
    IsA,
    /// Any other relationship, e.g. `part_of`
    Other(String),
}

impl From<&str> for Relation {
    fn from(value: &str) -> Self {
        match value {
            "is_a" => Relation::IsA,
            other => Relation::Other(other.to_string()),
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::IsA => write!(f, "is_a"),
            Relation::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Position of a node inside the ontology arena
///
/// Terms and alias nodes both occupy one slot.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct NodeIndex(u32);

impl NodeIndex {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for NodeIndex {
    fn from(n: usize) -> Self {
        Self(
            n.try_into()
                .expect("the arena cannot hold more than u32::MAX nodes"),
        )
    }
}
