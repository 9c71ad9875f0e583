//! Term matcher.
//!
//! Locates every boundary-delimited, case-insensitive occurrence of a set of terms in a text and
//! resolves overlaps by longest-match precedence.
//!
//! ## Algorithm
//!
//! Candidates are ordered by descending length of `original` (ties keep their input order).
//! Each candidate is then scanned over the whole text; an occurrence is *claimed* only if
//!
//! - it is not immediately preceded or followed by a word character, and
//! - it does not overlap a region already claimed by a longer (earlier) candidate.
//!
//! Claims are kept in a `BTreeMap` keyed by start offset. Because claims never overlap, the only
//! claim that can intersect `[start, end)` is the one with the greatest start below `end`.
//!
//! Offsets are byte offsets into the UTF-8 text and always fall on `char` boundaries; use
//! [`MatchSpan::char_range`] for offsets in Unicode scalar values.

use crate::term::TermRecord;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

/// A located occurrence of a term: `text[start..end]` matched `term`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub term: Arc<TermRecord>,
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    /// The matched slice of `text`, with the casing it has in the text.
    ///
    /// Returns an empty string if `text` is not the text this span was produced from and the
    /// range does not fit it.
    pub fn matched<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.start..self.end).unwrap_or_default()
    }

    pub fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The span as offsets in Unicode scalar values rather than bytes.
    pub fn char_range(&self, text: &str) -> Range<usize> {
        let start = text
            .get(..self.start)
            .map(|prefix| prefix.chars().count())
            .unwrap_or_default();
        let len = self.matched(text).chars().count();
        start..start + len
    }
}

/// Finds all non-overlapping occurrences of `candidates` in `text`, ordered by start offset.
///
/// Total over its inputs: empty text, an empty candidate list and malformed candidates (empty
/// `original`) all simply contribute no matches.
pub fn find_matches(text: &str, candidates: &[Arc<TermRecord>]) -> Vec<MatchSpan> {
    if text.is_empty() || candidates.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&Arc<TermRecord>> = candidates
        .iter()
        .filter(|record| {
            let ok = record.is_well_formed();
            if !ok {
                tracing::debug!("skipping candidate term with empty original");
            }
            ok
        })
        .collect();
    ordered.sort_by_key(|record| std::cmp::Reverse(record.match_len()));

    let mut claims: BTreeMap<usize, (usize, Arc<TermRecord>)> = BTreeMap::new();

    for record in ordered {
        let Some(pattern) = term_pattern(record.original.trim()) else {
            continue;
        };

        let mut at = 0;
        while at < text.len() {
            let Some(found) = pattern.find_at(text, at) else {
                break;
            };
            let (start, end) = (found.start(), found.end());
            if start == end {
                break;
            }

            if is_delimited(text, start, end) && !is_claimed(&claims, start, end) {
                claims.insert(start, (end, Arc::clone(record)));
                at = end;
            } else {
                // Retry one character later: a rejected occurrence may hide an overlapping one
                // that is properly delimited.
                at = start + text[start..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    claims
        .into_iter()
        .map(|(start, (end, term))| MatchSpan { term, start, end })
        .collect()
}

fn term_pattern(term: &str) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            tracing::warn!("skipping term that cannot be compiled into a pattern: {}", e);
            None
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_delimited(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn is_claimed(claims: &BTreeMap<usize, (usize, Arc<TermRecord>)>, start: usize, end: usize) -> bool {
    claims
        .range(..end)
        .next_back()
        .is_some_and(|(_, (claimed_end, _))| *claimed_end > start)
}
