//! Session glossary: the set of terms a user has bookmarked.
//!
//! Keys are [`TermKey`]s, so saving "Dyspnea" and later asking about "dyspnea" agree. All
//! operations are total and serialised by an internal mutex, so one glossary can be shared
//! between request handlers behind an `Arc`.

use medsimplify_types::TermKey;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct SessionGlossary {
    saved: Mutex<HashSet<TermKey>>,
}

impl SessionGlossary {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<TermKey>> {
        // The set is valid after any panic mid-operation, so a poisoned lock is still usable.
        self.saved.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds the term. Returns `true` if it was not already saved.
    pub fn save(&self, term: impl AsRef<str>) -> bool {
        self.lock().insert(TermKey::new(term))
    }

    /// Removes the term. Returns `true` if it was saved.
    pub fn unsave(&self, term: impl AsRef<str>) -> bool {
        self.lock().remove(&TermKey::new(term))
    }

    pub fn is_saved(&self, term: impl AsRef<str>) -> bool {
        self.lock().contains(&TermKey::new(term))
    }

    /// Saves the term if absent, removes it if present. Returns the new saved state.
    pub fn toggle(&self, term: impl AsRef<str>) -> bool {
        let key = TermKey::new(term);
        let mut saved = self.lock();
        if saved.remove(&key) {
            false
        } else {
            saved.insert(key);
            true
        }
    }

    /// Snapshot of the saved keys, sorted for stable output.
    pub fn keys(&self) -> Vec<TermKey> {
        let mut keys: Vec<TermKey> = self.lock().iter().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
