//! Term dictionary.
//!
//! A [`TermDictionary`] is a read-only, case-insensitive index over [`TermRecord`]s. It can be
//! built from the built-in list, from a JSON file, or from whatever a provider returned; the
//! matcher does not care where the records came from.
//!
//! Building a dictionary normalises its input:
//! - `original` is trimmed of surrounding whitespace
//! - records whose `original` is empty are skipped (logged at debug level)
//! - duplicate keys (compared case-insensitively) keep the first record seen

use crate::constants::{BUILTIN_TERMS, REFERENCE_BASE_URL};
use crate::error::{CoreError, CoreResult};
use crate::matcher::find_matches;
use crate::term::TermRecord;
use medsimplify_types::{NonEmptyText, TermKey};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct TermDictionary {
    records: Vec<Arc<TermRecord>>,
    index: HashMap<TermKey, usize>,
}

impl TermDictionary {
    /// Builds a dictionary from arbitrary records, dropping malformed entries and duplicates.
    pub fn from_records(records: impl IntoIterator<Item = TermRecord>) -> Self {
        let mut dictionary = Self::default();
        for record in records {
            dictionary.insert(record);
        }
        dictionary
    }

    /// The dictionary shipped with the application.
    pub fn builtin() -> Self {
        Self::from_records(BUILTIN_TERMS.iter().map(
            |(original, simplified, definition, article)| {
                TermRecord::new(
                    *original,
                    *simplified,
                    *definition,
                    Some(format!("{REFERENCE_BASE_URL}{article}")),
                )
            },
        ))
    }

    /// Parses a JSON array of term records.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DictionaryParse` if the input is not a JSON array of records. Records
    /// with an empty `original` are not an error; they are skipped.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let records: Vec<TermRecord> =
            serde_json::from_str(json).map_err(CoreError::DictionaryParse)?;
        Ok(Self::from_records(records))
    }

    /// Reads and parses a JSON dictionary file.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::DictionaryRead` if the file cannot be read, or
    /// `CoreError::DictionaryParse` if its content is not a JSON array of records.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(CoreError::DictionaryRead)?;
        Self::from_json_str(&contents)
    }

    fn insert(&mut self, mut record: TermRecord) {
        let original = match NonEmptyText::new(&record.original) {
            Ok(text) => text,
            Err(_) => {
                tracing::debug!("skipping dictionary entry with empty term");
                return;
            }
        };

        let key = TermKey::from(&original);
        if self.index.contains_key(&key) {
            tracing::debug!("skipping duplicate dictionary entry: {}", key);
            return;
        }

        record.original = original.into_inner();
        self.index.insert(key, self.records.len());
        self.records.push(Arc::new(record));
    }

    /// Case-insensitive lookup by term.
    pub fn lookup(&self, term: &str) -> Option<&Arc<TermRecord>> {
        self.index
            .get(&TermKey::new(term))
            .map(|&position| &self.records[position])
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[Arc<TermRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The distinct records occurring in `text`, in order of first appearance.
    pub fn terms_in(&self, text: &str) -> Vec<Arc<TermRecord>> {
        let mut seen = HashSet::new();
        find_matches(text, &self.records)
            .into_iter()
            .filter(|span| seen.insert(span.term.key()))
            .map(|span| span.term)
            .collect()
    }
}
