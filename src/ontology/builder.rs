//! Step-wise construction of an [`Ontology`]
//!
//! The [`Builder`] moves through three states:
//!
//! 1. [`LooseCollection`]: term records are added, nothing is connected yet
//! 2. [`AllTerms`]: all terms are known, relationships can be connected
//! 3. [`ConnectedTerms`]: the hierarchy is complete, the ontology can be built
//!
//! Relationships of a record can point to terms that come later in the file,
//! so they are queued while adding records and only resolved in the second step.
use std::marker::PhantomData;

use tracing::{debug, trace, warn};

use crate::parser::TermRecord;
use crate::term::{Relation, TermId};
use crate::{OboError, OboResult, Ontology};

/// Builder state: collecting term records
pub struct LooseCollection;
/// Builder state: all terms are present
pub struct AllTerms;
/// Builder state: all relationships are connected
pub struct ConnectedTerms;

/// Controls which terms and relationships are part of the ontology
///
/// # Examples
///
/// ```
/// use obogo::BuilderConfig;
///
/// let config = BuilderConfig::default()
///     .keep_obsolete(false)
///     .namespace("biological_process")
///     .relationships(&["is_a", "part_of"]);
/// assert_eq!(config.get_relationships(), &["is_a", "part_of"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    keep_obsolete: bool,
    namespace: Option<String>,
    relationships: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            keep_obsolete: true,
            namespace: None,
            relationships: vec!["is_a".to_string()],
        }
    }
}

impl BuilderConfig {
    /// Keep obsolete terms in the ontology (default: `true`)
    ///
    /// Obsolete terms are needed to resolve outdated identifiers.
    #[must_use]
    pub fn keep_obsolete(mut self, keep: bool) -> Self {
        self.keep_obsolete = keep;
        self
    }

    /// Only keep terms of the given namespace (default: all namespaces)
    #[must_use]
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// The relationships that become edges of the ontology (default: `is_a`)
    ///
    /// Other relationships are taken from `relationship: <name> <id>` lines.
    #[must_use]
    pub fn relationships(mut self, relationships: &[&str]) -> Self {
        self.relationships = relationships.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Returns `true` if obsolete terms are kept
    pub fn get_keep_obsolete(&self) -> bool {
        self.keep_obsolete
    }

    /// The namespace filter, if any
    pub fn get_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The relationships that become edges
    pub fn get_relationships(&self) -> &[String] {
        &self.relationships
    }

    /// Returns `true` if a record passes the obsolete and namespace filters
    fn accepts(&self, record: &TermRecord) -> OboResult<bool> {
        if !self.keep_obsolete && record.is_obsolete() {
            return Ok(false);
        }
        match &self.namespace {
            Some(namespace) => Ok(record.optional("namespace")? == Some(namespace.as_str())),
            None => Ok(true),
        }
    }
}

struct Connection {
    parent: String,
    child: TermId,
    relation: Relation,
}

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        ontology: builder.ontology,
        connections: builder.connections,
        config: builder.config,
        state: PhantomData,
    }
}

/// Builds an [`Ontology`] from term records
///
/// # Examples
///
/// ```
/// use obogo::{Builder, Relation, TermRecord};
///
/// let mut root = TermRecord::default();
/// root.push("id", "GO:0000001");
/// root.push("name", "root");
///
/// let mut child = TermRecord::default();
/// child.push("id", "GO:0000002");
/// child.push("name", "child");
/// child.push("is_a", "GO:0000001");
///
/// let mut builder = Builder::new();
/// builder.add_record(&child).unwrap();
/// builder.add_record(&root).unwrap();
///
/// let ontology = builder.terms_complete().connect_all_terms().build();
/// let child = ontology.resolve("child").unwrap().unwrap();
/// assert_eq!(child.parents().next().unwrap().name(), "root");
/// ```
pub struct Builder<T> {
    ontology: Ontology,
    connections: Vec<Connection>,
    config: BuilderConfig,
    state: PhantomData<T>,
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<LooseCollection> {
    /// Creates a new builder with the default [`BuilderConfig`]
    pub fn new() -> Builder<LooseCollection> {
        Self::with_config(BuilderConfig::default())
    }

    /// Creates a new builder
    pub fn with_config(config: BuilderConfig) -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            ontology: Ontology::default(),
            connections: Vec::new(),
            config,
            state: PhantomData,
        }
    }

    /// Adds a term record to the ontology
    ///
    /// Records that do not pass the [`BuilderConfig`] filters are ignored.
    /// The configured relationships of the record are queued and connected
    /// in [`Builder::connect_all_terms`]. Obsolete terms never get any edges.
    ///
    /// # Errors
    ///
    /// - [`OboError::MalformedRecord`]: the record has no or an invalid id
    /// - [`OboError::DuplicateTerm`]: a term with the same id is already present
    pub fn add_record(&mut self, record: &TermRecord) -> OboResult<()> {
        if !self.config.accepts(record)? {
            trace!("Skipping {}", record);
            return Ok(());
        }
        let index = self.ontology.insert_record(record)?;
        if record.is_obsolete() {
            return Ok(());
        }

        let child = TermId::try_from(record.single("id")?)?;
        for relation in &self.config.relationships {
            for parent in record.values(relation) {
                self.connections.push(Connection {
                    parent: parent.clone(),
                    child: child.clone(),
                    relation: Relation::from(relation.as_str()),
                });
            }
        }
        trace!("Added {} at {:?}", child, index);
        Ok(())
    }

    /// Marks the end of the record collection
    #[must_use]
    pub fn terms_complete(self) -> Builder<AllTerms> {
        transition_state(self)
    }
}

impl Builder<AllTerms> {
    /// Adds a connection from a term to its parent
    ///
    /// See [`Ontology::add_parent`]
    ///
    /// # Errors
    ///
    /// [`OboError::UnknownIdentifier`] if one of the ids is not present
    pub fn add_parent(&mut self, parent: &str, child: &str, relation: Relation) -> OboResult<bool> {
        self.ontology.add_parent(parent, child, relation)
    }

    /// Connects all queued relationships
    ///
    /// Relationships to terms that are not part of the ontology (e.g. removed
    /// by the namespace filter) are skipped with a log message.
    #[must_use]
    pub fn connect_all_terms(mut self) -> Builder<ConnectedTerms> {
        let connections = std::mem::take(&mut self.connections);
        let mut skipped = 0usize;
        for connection in connections {
            match self.ontology.add_parent(
                &connection.parent,
                connection.child.as_str(),
                connection.relation,
            ) {
                Ok(_) => (),
                Err(OboError::UnknownIdentifier(id)) => {
                    skipped += 1;
                    if self.config.namespace.is_some() {
                        debug!("{} is not part of the ontology, skipping parent of {}", id, connection.child);
                    } else {
                        warn!("{} is not part of the ontology, skipping parent of {}", id, connection.child);
                    }
                }
                Err(err) => {
                    skipped += 1;
                    warn!("Unable to connect {}: {}", connection.child, err);
                }
            }
        }
        if skipped > 0 {
            debug!("Skipped {} relationships", skipped);
        }
        transition_state(self)
    }
}

impl Builder<ConnectedTerms> {
    /// Returns the finished [`Ontology`]
    pub fn build(self) -> Ontology {
        self.ontology
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::record;

    #[test]
    fn config_defaults() {
        let config = BuilderConfig::default();
        assert!(config.get_keep_obsolete());
        assert!(config.get_namespace().is_none());
        assert_eq!(config.get_relationships(), &["is_a"]);
    }

    #[test]
    fn forward_references() {
        let mut builder = Builder::new();
        builder
            .add_record(&record(&[("id", "GO:0000002"), ("is_a", "GO:0000001")]))
            .unwrap();
        builder.add_record(&record(&[("id", "GO:0000001")])).unwrap();
        let ontology = builder.terms_complete().connect_all_terms().build();
        assert_eq!(ontology.n_relations(), 1);
    }

    #[test]
    fn dangling_parent() {
        let mut builder = Builder::new();
        builder
            .add_record(&record(&[("id", "GO:0000002"), ("is_a", "GO:0000001")]))
            .unwrap();
        let ontology = builder.terms_complete().connect_all_terms().build();
        assert_eq!(ontology.len(), 1);
        assert_eq!(ontology.n_relations(), 0);
        assert_eq!(ontology.roots().count(), 1);
    }

    #[test]
    fn obsolete_terms_have_no_edges() {
        let mut builder = Builder::new();
        builder.add_record(&record(&[("id", "GO:0000001")])).unwrap();
        builder
            .add_record(&record(&[
                ("id", "GO:0000002"),
                ("is_obsolete", "true"),
                ("is_a", "GO:0000001"),
            ]))
            .unwrap();
        builder
            .add_record(&record(&[("id", "GO:0000003"), ("is_a", "GO:0000002")]))
            .unwrap();
        let ontology = builder.terms_complete().connect_all_terms().build();
        assert_eq!(ontology.len(), 3);
        assert_eq!(ontology.n_relations(), 0);
    }

    #[test]
    fn drop_obsolete() {
        let config = BuilderConfig::default().keep_obsolete(false);
        let ontology = Ontology::from_obo_with("tests/small.obo", &config).unwrap();
        assert_eq!(ontology.len(), 9);
        assert!(ontology.resolve("GO:0003783").is_err());
    }

    #[test]
    fn namespace_filter() {
        let config = BuilderConfig::default().namespace("biological_process");
        let ontology = Ontology::from_obo_with("tests/small.obo", &config).unwrap();
        // 7 concrete and 2 obsolete terms
        assert_eq!(ontology.len(), 9);
        assert!(ontology.resolve("catalytic activity").is_err());
    }

    #[test]
    fn additional_relationships() {
        let config = BuilderConfig::default().relationships(&["is_a", "part_of"]);
        let ontology = Ontology::from_obo_with("tests/small.obo", &config).unwrap();
        let energy = ontology
            .resolve("generation of precursor metabolites and energy")
            .unwrap()
            .unwrap();
        let cellular = ontology.resolve("cellular process").unwrap().unwrap();
        assert_eq!(energy.parents().len(), 2);
        assert_eq!(
            energy.relation_to(&cellular),
            Some(&Relation::from("part_of"))
        );
    }

    #[test]
    fn manual_parent() {
        let mut builder = Builder::new();
        builder.add_record(&record(&[("id", "GO:0000001")])).unwrap();
        builder.add_record(&record(&[("id", "GO:0000002")])).unwrap();
        let mut builder = builder.terms_complete();
        assert!(builder
            .add_parent("GO:0000001", "GO:0000002", Relation::IsA)
            .unwrap());
        let ontology = builder.connect_all_terms().build();
        assert_eq!(ontology.leaves().count(), 1);
    }
}
