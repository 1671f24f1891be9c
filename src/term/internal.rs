use crate::parser::TermRecord;
use crate::term::{NodeIndex, TermGroup, TermId};
use crate::OboResult;

/// Descriptive payload of an ontology term, taken from its term record
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct TermData {
    pub name: String,
    pub namespace: Option<String>,
    pub definition: Option<String>,
    pub synonyms: Vec<String>,
    pub alt_ids: Vec<TermId>,
    pub obsolete: bool,
    pub replaced_by: Option<TermId>,
    pub consider: Vec<TermId>,
}

impl TermData {
    /// Extracts the term attributes from a record
    ///
    /// Relationship fields (`is_a` etc.) are not part of the term data,
    /// they are turned into edges by the builder.
    pub fn try_from_record(record: &TermRecord) -> OboResult<TermData> {
        Ok(TermData {
            name: record.optional("name")?.unwrap_or_default().to_string(),
            namespace: record.optional("namespace")?.map(str::to_string),
            definition: record.optional("def")?.map(str::to_string),
            synonyms: record.values("synonym").to_vec(),
            alt_ids: record
                .values("alt_id")
                .iter()
                .map(|id| TermId::try_from(id.as_str()))
                .collect::<OboResult<Vec<TermId>>>()?,
            obsolete: record.is_obsolete(),
            replaced_by: record
                .optional("replaced_by")?
                .map(TermId::try_from)
                .transpose()?,
            consider: record
                .values("consider")
                .iter()
                .map(|id| TermId::try_from(id.as_str()))
                .collect::<OboResult<Vec<TermId>>>()?,
        })
    }
}

/// What a node of the arena stands for
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeKind {
    /// A real term, obsolete or not
    Term(TermData),
    /// An alternative identifier of the term at the given index
    Alias(NodeIndex),
}

/// Identity and position of a node in the ontology
///
/// Annotation state is not stored here but in the ontology's state table,
/// which is addressed by the same [`NodeIndex`].
#[derive(Debug)]
pub(crate) struct TermInternal {
    id: TermId,
    kind: NodeKind,
    parents: TermGroup,
    children: TermGroup,
}

impl TermInternal {
    pub fn new(id: TermId, data: TermData) -> TermInternal {
        TermInternal {
            id,
            kind: NodeKind::Term(data),
            parents: TermGroup::new(),
            children: TermGroup::new(),
        }
    }

    pub fn alias(id: TermId, canonical: NodeIndex) -> TermInternal {
        TermInternal {
            id,
            kind: NodeKind::Alias(canonical),
            parents: TermGroup::new(),
            children: TermGroup::new(),
        }
    }

    pub fn id(&self) -> &TermId {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The term payload, `None` for alias nodes
    pub fn data(&self) -> Option<&TermData> {
        match &self.kind {
            NodeKind::Term(data) => Some(data),
            NodeKind::Alias(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        self.data().map_or("", |data| data.name.as_str())
    }

    pub fn alias_of(&self) -> Option<NodeIndex> {
        match self.kind {
            NodeKind::Alias(canonical) => Some(canonical),
            NodeKind::Term(_) => None,
        }
    }

    /// A term that is neither an alias nor obsolete
    pub fn is_concrete(&self) -> bool {
        self.data().is_some_and(|data| !data.obsolete)
    }

    pub fn parents(&self) -> &TermGroup {
        &self.parents
    }

    pub fn children(&self) -> &TermGroup {
        &self.children
    }

    pub fn add_parent(&mut self, parent: NodeIndex) -> bool {
        self.parents.insert(parent)
    }

    pub fn add_child(&mut self, child: NodeIndex) -> bool {
        self.children.insert(child)
    }
}

impl PartialEq for TermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TermInternal {}
