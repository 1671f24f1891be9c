//! Reads OBO flat files
//!
//! ```text
//! [Term]
//! id: GO:0000001
//! name: mitochondrion inheritance
//! namespace: biological_process
//! def: "The distribution of mitochondria into daughter cells." [GOC:mcc]
//! synonym: "mitochondrial inheritance" EXACT []
//! is_a: GO:0048308 ! organelle inheritance
//! is_a: GO:0048311 ! mitochondrion distribution
//! ```
//!
//! Only `[Term]` stanzas are read, all other stanzas (e.g. `[Typedef]`) and
//! the file header are skipped. Each stanza becomes one [`TermRecord`].
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use tracing::trace;

use crate::parser::TermRecord;
use crate::{OboError, OboResult};

/// Opens an OBO file and returns an iterator of its term records
///
/// # Errors
///
/// [`OboError::CannotOpenFile`] if the file is not present or can't be opened
pub fn records<P: AsRef<Path>>(filename: P) -> OboResult<OboRecords<BufReader<File>>> {
    let name = filename.as_ref().display().to_string();
    let file = File::open(filename).map_err(|_| OboError::CannotOpenFile(name))?;
    Ok(OboRecords::new(BufReader::new(file)))
}

/// Iterator of [`TermRecord`]s from any buffered reader
///
/// A line inside a `[Term]` stanza that is not a `key: value` pair is
/// a [`OboError::MalformedRecord`]. After the first error the iterator is
/// exhausted, a corrupt file is not parsed any further.
///
/// # Examples
///
/// ```
/// use obogo::parser::obo::OboRecords;
///
/// let data = "format-version: 1.2\n\n[Term]\nid: GO:0000001\nname: foo\nis_a: GO:0000002 ! bar\n";
/// let records: Vec<_> = OboRecords::new(data.as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].single("is_a").unwrap(), "GO:0000002");
/// ```
pub struct OboRecords<R> {
    lines: Lines<R>,
    record: TermRecord,
    in_term: bool,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> OboRecords<R> {
    /// Constructs a new [`OboRecords`] iterator
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            record: TermRecord::default(),
            in_term: false,
            line_number: 0,
            done: false,
        }
    }

    fn take_record(&mut self) -> Option<TermRecord> {
        if self.record.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.record))
        }
    }

    fn fail(&mut self, err: OboError) -> Option<OboResult<TermRecord>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for OboRecords<R> {
    type Item = OboResult<TermRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some(line) = self.lines.next() else {
                self.done = true;
                return self.take_record().map(Ok);
            };
            let line = match line {
                Ok(line) => line,
                Err(err) => return self.fail(OboError::InvalidInput(err.to_string())),
            };
            self.line_number += 1;
            let line = line.trim_end();

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let finished = self.take_record();
                self.in_term = header == "Term";
                if !self.in_term {
                    trace!("Ignoring [{}] stanza", header);
                }
                match finished {
                    Some(record) => return Some(Ok(record)),
                    None => continue,
                }
            }

            if line.trim_start().is_empty() {
                match self.take_record() {
                    Some(record) => return Some(Ok(record)),
                    None => continue,
                }
            }

            if !self.in_term {
                continue;
            }

            match parse_line(line) {
                Some((key, value)) => self.record.push(key, value),
                None => {
                    let msg = format!("line {}: {}", self.line_number, line);
                    return self.fail(OboError::MalformedRecord(msg));
                }
            }
        }
    }
}

/// Splits a stanza line into field name and value
///
/// - quoted values (`def`, `synonym`) keep only the quoted text
/// - `name` keeps the full remainder of the line
/// - `relationship: part_of GO:0000001` is returned as (`part_of`, `GO:0000001`)
/// - every other value is cut at the first whitespace, dropping `! comments`
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(": ")?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    if value.starts_with('"') {
        return quoted(value).map(|text| (key, text));
    }
    match key {
        "name" => Some((key, value)),
        "relationship" => {
            let mut parts = value.split_whitespace();
            Some((parts.next()?, parts.next()?))
        }
        _ => value.split_whitespace().next().map(|token| (key, token)),
    }
}

/// Returns the text between the leading quote and the next unescaped quote
fn quoted(value: &str) -> Option<&str> {
    let inner = value.strip_prefix('"')?;
    let mut escaped = false;
    for (idx, c) in inner.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(&inner[..idx]),
            _ => escaped = false,
        }
    }
    None
}
