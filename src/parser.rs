//! Parsing ontology and annotation source files
//!
//! - [`obo`] reads OBO flat files into [`TermRecord`]s
//! - [`gaf`] reads GO annotation files into [`Entity`](crate::Entity)s

use std::collections::HashMap;

use crate::{OboError, OboResult};

pub mod gaf;
pub mod obo;

/// One stanza of an ontology file, as a mapping of field name to values
///
/// Every field holds an ordered list of values, even if it occurs only once.
/// Call sites that expect exactly one value use [`TermRecord::single`] or
/// [`TermRecord::optional`], which fail on unexpected cardinality instead of
/// silently picking one of the values.
///
/// # Examples
///
/// ```
/// use obogo::TermRecord;
///
/// let mut record = TermRecord::default();
/// record.push("id", "GO:0000001");
/// record.push("is_a", "GO:0048308");
/// record.push("is_a", "GO:0048311");
///
/// assert_eq!(record.single("id").unwrap(), "GO:0000001");
/// assert_eq!(record.values("is_a").len(), 2);
/// assert!(record.single("is_a").is_err());
/// assert!(record.optional("name").unwrap().is_none());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TermRecord {
    fields: HashMap<String, Vec<String>>,
}

impl TermRecord {
    /// Appends `value` to the values of the field `key`
    pub fn push<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// All values of the field, in file order, or an empty slice
    pub fn values(&self, key: &str) -> &[String] {
        self.fields
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` if the field is present at least once
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The one and only value of a required field
    ///
    /// # Errors
    ///
    /// [`OboError::MalformedRecord`] if the field is missing or repeated
    pub fn single(&self, key: &str) -> OboResult<&str> {
        self.optional(key)?.ok_or_else(|| {
            OboError::MalformedRecord(format!("missing field \"{key}\" in {self}"))
        })
    }

    /// The value of an optional field that may occur at most once
    ///
    /// # Errors
    ///
    /// [`OboError::MalformedRecord`] if the field is repeated
    pub fn optional(&self, key: &str) -> OboResult<Option<&str>> {
        match self.values(key) {
            [] => Ok(None),
            [value] => Ok(Some(value.as_str())),
            _ => Err(OboError::MalformedRecord(format!(
                "field \"{key}\" must occur only once in {self}"
            ))),
        }
    }

    /// Returns `true` if the record carries an `is_obsolete` field
    ///
    /// The value of the field is not evaluated.
    pub fn is_obsolete(&self) -> bool {
        self.contains("is_obsolete")
    }

    /// Returns `true` if the record does not contain any field
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes all fields
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl std::fmt::Display for TermRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.values("id").first() {
            Some(id) => write!(f, "record {id}"),
            None => write!(f, "record without id"),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TermRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = TermRecord::default();
        for (key, value) in iter {
            record.push(key, value);
        }
        record
    }
}
