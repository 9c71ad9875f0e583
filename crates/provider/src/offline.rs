//! Offline answers, used when the remote provider cannot be called.

use crate::acquire::AcquiredContent;
use medsimplify_core::constants::SAMPLE_DOCUMENT_TEXT;
use medsimplify_core::TermDictionary;

/// The records of `dictionary` occurring in `text`, with `text` as the source text.
pub fn offline_text(dictionary: &TermDictionary, text: &str) -> AcquiredContent {
    AcquiredContent {
        source_text: text.to_string(),
        terms: dictionary
            .terms_in(text)
            .into_iter()
            .map(|record| record.as_ref().clone())
            .collect(),
    }
}

/// The canned sample document with the built-in records it contains.
///
/// Image recognition needs the remote provider, so no part of the uploaded image is used.
pub fn offline_image() -> AcquiredContent {
    offline_text(&TermDictionary::builtin(), SAMPLE_DOCUMENT_TEXT)
}
