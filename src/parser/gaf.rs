//! Reads GO annotation files (GAF 2.x)
//!
//! # Example line
//!
//! ```text
//! UniProtKB  P00001  ATP5F1A  involved_in  GO:0006119  PMID:1  IDA    P  ATP synthase subunit alpha    protein  taxon:9606  20230101  UniProt
//! UniProtKB  P00003  RPS6     NOT|involved_in  GO:0006119  PMID:3  IDA    P  40S ribosomal protein S6  protein  taxon:9606  20230101  UniProt
//! ```
//!
//! Lines starting with `!` are comments. Annotations with a `NOT` qualifier
//! are skipped.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::annotations::{Entity, EntityId};
use crate::{OboError, OboResult, DEFAULT_NUM_ENTITIES};

struct ParsedAnnotation<'a> {
    entity_id: &'a str,
    symbol: &'a str,
    term_id: &'a str,
}

/// Parses a single data line of a GAF file
///
/// Returns `Ok(None)` for negated annotations
fn parse_line(line: &str) -> OboResult<Option<ParsedAnnotation<'_>>> {
    let mut cols = line.split('\t');

    // Column 1 is the source database, e.g. UniProtKB
    if cols.next().is_none() {
        return Err(OboError::InvalidInput(line.to_string()));
    }

    // Column 2 is the entity identifier
    let Some(entity_id) = cols.next().filter(|id| !id.is_empty()) else {
        return Err(OboError::InvalidInput(line.to_string()));
    };

    // Column 3 is the entity symbol
    let Some(symbol) = cols.next() else {
        return Err(OboError::InvalidInput(line.to_string()));
    };

    // Column 4 holds `|`-separated qualifiers
    let Some(qualifier) = cols.next() else {
        return Err(OboError::InvalidInput(line.to_string()));
    };
    if qualifier.split('|').any(|q| q == "NOT") {
        return Ok(None);
    }

    // Column 5 is the ontology term
    let Some(term_id) = cols.next().filter(|id| !id.is_empty()) else {
        return Err(OboError::InvalidInput(line.to_string()));
    };

    Ok(Some(ParsedAnnotation {
        entity_id,
        symbol,
        term_id,
    }))
}

/// Parse a GAF file from disk
///
/// # Errors
///
/// - [`OboError::CannotOpenFile`]: Source file not present or can't be opened
/// - [`OboError::InvalidInput`]: A data line has too few columns
pub fn parse<P: AsRef<Path>>(file: P) -> OboResult<Vec<Entity>> {
    let filename = file.as_ref().display().to_string();
    let file = File::open(file).map_err(|_| OboError::CannotOpenFile(filename))?;
    parse_reader(BufReader::new(file))
}

/// Parse GAF data from any buffered reader
///
/// Returns one [`Entity`] per entity identifier, in order of first
/// appearance, holding all of its (non-negated) term references.
///
/// # Errors
///
/// [`OboError::InvalidInput`]: A data line has too few columns or can't be read
///
/// # Examples
///
/// ```
/// use obogo::Annotated;
/// use obogo::parser::gaf::parse_reader;
///
/// let data = "!gaf-version: 2.2\nUniProtKB\tP1\tABC1\t\tGO:0006412\tPMID:1\tIDA\t\tP\n";
/// let entities = parse_reader(data.as_bytes()).unwrap();
///
/// assert_eq!(entities.len(), 1);
/// assert_eq!(entities[0].entity_id().as_str(), "P1");
/// assert_eq!(entities[0].term_refs(), &["GO:0006412"]);
/// ```
pub fn parse_reader<R: BufRead>(reader: R) -> OboResult<Vec<Entity>> {
    let mut entities: Vec<Entity> = Vec::with_capacity(DEFAULT_NUM_ENTITIES);
    let mut positions: HashMap<EntityId, usize> = HashMap::with_capacity(DEFAULT_NUM_ENTITIES);

    for line in reader.lines() {
        let line = line.map_err(|err| OboError::InvalidInput(err.to_string()))?;
        if line.starts_with('!') || line.trim().is_empty() {
            continue;
        }
        let Some(annotation) = parse_line(&line)? else {
            debug!("Skipping negated annotation: {}", line);
            continue;
        };

        let id = EntityId::from(annotation.entity_id);
        let idx = *positions.entry(id.clone()).or_insert_with(|| {
            entities.push(Entity::new(id, annotation.symbol));
            entities.len() - 1
        });
        entities[idx].add_term(annotation.term_id);
    }
    Ok(entities)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::Annotated;

    #[test]
    fn test_parse_correct_line() {
        let line = "UniProtKB\tP00001\tATP5F1A\tinvolved_in\tGO:0006119\tPMID:1\tIDA\t\tP";
        let res = parse_line(line)
            .expect("This line should parse correctly")
            .expect("This line is not negated");
        assert_eq!(res.entity_id, "P00001");
        assert_eq!(res.symbol, "ATP5F1A");
        assert_eq!(res.term_id, "GO:0006119");
    }

    #[test]
    fn test_skip_not() {
        let line = "UniProtKB\tP00003\tRPS6\tNOT|involved_in\tGO:0006119\tPMID:3\tIDA\t\tP";
        assert!(parse_line(line).unwrap().is_none());
    }

    #[test]
    fn test_missing_term() {
        let line = "UniProtKB\tP00003\tRPS6\tinvolved_in";
        assert!(parse_line(line).is_err());
    }

    #[test]
    fn test_invalid_input() {
        let line = "UniProtKB P00003 RPS6 involved_in GO:0006119";
        assert!(parse_line(line).is_err());
    }

    #[test]
    fn test_parse_file() {
        let entities = parse("tests/small.gaf").unwrap();
        assert_eq!(entities.len(), 7);

        assert_eq!(entities[0].entity_id().as_str(), "P00001");
        assert_eq!(entities[0].name(), "ATP5F1A");
        assert_eq!(entities[0].term_refs(), &["GO:0006119", "GO:0003824"]);

        // the negated annotation is skipped
        assert_eq!(entities[2].entity_id().as_str(), "P00003");
        assert_eq!(entities[2].term_refs(), &["GO:0006416"]);
    }
}
