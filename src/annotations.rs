//! Biological entities (e.g. proteins) are linked to ontology terms and make up
//! the annotations of the ontology
//!
//! Every entity has a unique [`EntityId`] and carries references to the
//! ontology terms it is annotated with. Entities are attached to the
//! ontology as one of two [`Population`]s:
//!
//! - the **background** population, e.g. the whole proteome
//! - the **measured** population, e.g. all proteins detected in an experiment
//!
//! Any type that implements [`Annotated`] can be loaded into the ontology,
//! [`Entity`] is a ready to use implementation.

use std::fmt::Display;
use std::str::FromStr;

use crate::utils::{parse_choice, Choice};
use crate::OboResult;

mod entity;
pub use entity::{Entities, Entity, EntityId};

/// An entity that is annotated to ontology terms
///
/// The term references can be identifiers, alternative identifiers,
/// obsolete identifiers or term names, they are resolved by the ontology
/// during loading.
pub trait Annotated {
    /// The unique identifier of the entity
    fn entity_id(&self) -> &EntityId;

    /// References to all terms the entity is annotated to
    fn term_refs(&self) -> &[String];
}

impl<T: Annotated + ?Sized> Annotated for &T {
    fn entity_id(&self) -> &EntityId {
        (**self).entity_id()
    }

    fn term_refs(&self) -> &[String] {
        (**self).term_refs()
    }
}

/// Anything that identifies an entity
///
/// This allows passing either plain identifiers (`&str`, `String`,
/// [`EntityId`]) or whole [`Entity`] records to the enrichment analysis.
pub trait EntityKey {
    /// The entity identifier as `str`
    fn entity_key(&self) -> &str;
}

impl EntityKey for str {
    fn entity_key(&self) -> &str {
        self
    }
}

impl EntityKey for String {
    fn entity_key(&self) -> &str {
        self
    }
}

impl EntityKey for EntityId {
    fn entity_key(&self) -> &str {
        self.as_str()
    }
}

impl EntityKey for Entity {
    fn entity_key(&self) -> &str {
        self.entity_id().as_str()
    }
}

impl<T: EntityKey + ?Sized> EntityKey for &T {
    fn entity_key(&self) -> &str {
        (**self).entity_key()
    }
}

/// The two annotation populations of the ontology
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Population {
    /// The full annotated universe, e.g. the proteome
    Background,
    /// The entities observed in an experiment
    Measured,
}

impl Population {
    /// Both populations
    pub const ALL: [Population; 2] = [Population::Background, Population::Measured];

    pub(crate) fn index(self) -> usize {
        match self {
            Population::Background => 0,
            Population::Measured => 1,
        }
    }

    /// The name of the population, as accepted by [`Population::from_str`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Population::Background => "background",
            Population::Measured => "measured",
        }
    }
}

impl Choice for Population {
    const PARAMETER: &'static str = "population";
    const NAMES: &'static [&'static str] = &["background", "measured"];
    const VARIANTS: &'static [Self] = &[Population::Background, Population::Measured];
}

impl FromStr for Population {
    type Err = crate::OboError;
    fn from_str(s: &str) -> OboResult<Self> {
        parse_choice(s)
    }
}

impl Display for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
