use core::fmt::Debug;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use crate::annotations::Annotated;

/// A set of entities
///
/// The set does not contain [`Entity`]s itself, but only their [`EntityId`]s.
pub type Entities = HashSet<EntityId>;

/// A unique identifier for an [`Entity`], e.g. a UniProt accession
///
/// Cloning is cheap, the identifier is shared between all sets it is part of.
#[derive(Clone, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct EntityId {
    inner: Arc<str>,
}

impl EntityId {
    /// The identifier as `str`
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId {
            inner: value.into(),
        }
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId {
            inner: value.into(),
        }
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EntityId({})", self.inner)
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// A single annotated entity
///
/// An entity has a unique [`EntityId`], a name (symbol) and is
/// connected to a list of ontology terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    name: String,
    terms: Vec<String>,
}

impl Entity {
    /// Initializes a new entity without any term references
    pub fn new(id: EntityId, name: &str) -> Entity {
        Entity {
            id,
            name: name.to_string(),
            terms: Vec::new(),
        }
    }

    /// The unique [`EntityId`] of the entity
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// The name of the entity (symbol)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a reference to an ontology term
    ///
    /// Returns `false` if the reference was already present
    pub fn add_term<T: Into<String>>(&mut self, term: T) -> bool {
        let term = term.into();
        if self.terms.contains(&term) {
            false
        } else {
            self.terms.push(term);
            true
        }
    }
}

impl Annotated for Entity {
    fn entity_id(&self) -> &EntityId {
        &self.id
    }

    fn term_refs(&self) -> &[String] {
        &self.terms
    }
}
