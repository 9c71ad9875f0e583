//! # MedSimplify Core
//!
//! Term matching and rendering for the MedSimplify medical text simplifier.
//!
//! This crate contains pure, synchronous operations only:
//! - [`dictionary`]: the case-insensitive term dictionary, including the built-in list
//! - [`matcher`]: boundary-aware, longest-match-first term location
//! - [`render`]: the annotated and substituted views of a text, plain and as HTML
//! - [`glossary`] and [`session`]: per-session bookmarked terms
//!
//! **No I/O beyond reading a dictionary file**: fetching terms from a remote provider belongs in
//! `medsimplify-provider`; HTTP serving belongs in `api-rest`.

pub mod constants;
pub mod dictionary;
pub mod error;
pub mod glossary;
pub mod matcher;
pub mod render;
pub mod session;
pub mod term;

pub use dictionary::TermDictionary;
pub use error::{CoreError, CoreResult};
pub use glossary::SessionGlossary;
pub use matcher::{find_matches, MatchSpan};
pub use medsimplify_types::{NonEmptyText, TermKey, TextError};
pub use render::{escape_html, RenderedContent, Segment};
pub use session::SessionRegistry;
pub use term::TermRecord;

/// Entry point for turning a text and a term list into rendered content.
#[derive(Default, Clone, Debug)]
pub struct SimplifierService;

impl SimplifierService {
    pub fn new() -> Self {
        Self
    }

    /// Matches `terms` against `text`.
    ///
    /// The terms are normalised as for [`TermDictionary::from_records`]: malformed entries are
    /// skipped and duplicates collapse to the first one. An empty term list is valid and yields
    /// content with no matches.
    pub fn simplify(
        &self,
        text: impl Into<String>,
        terms: impl IntoIterator<Item = TermRecord>,
    ) -> RenderedContent {
        let dictionary = TermDictionary::from_records(terms);
        self.simplify_with(text, &dictionary)
    }

    /// Matches every record of `dictionary` against `text`.
    pub fn simplify_with(
        &self,
        text: impl Into<String>,
        dictionary: &TermDictionary,
    ) -> RenderedContent {
        let content = RenderedContent::build(text, dictionary.records());
        tracing::debug!(
            "matched {} occurrences of {} distinct terms",
            content.matches().len(),
            content.terms_count()
        );
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_end_to_end() {
        let service = SimplifierService::new();
        let content = service.simplify(
            "Patient has dyspnea and tachycardia.",
            vec![
                TermRecord::new("dyspnea", "difficulty breathing", "", None),
                TermRecord::new("tachycardia", "fast heart rate", "", None),
            ],
        );

        let matched: Vec<(&str, usize)> = content
            .matches()
            .iter()
            .map(|span| (span.term.original.as_str(), span.start))
            .collect();
        assert_eq!(matched, vec![("dyspnea", 12), ("tachycardia", 24)]);
        assert_eq!(
            content.substituted_text(),
            "Patient has difficulty breathing and fast heart rate."
        );
    }

    #[test]
    fn test_simplify_with_builtin_sample_document() {
        let service = SimplifierService::new();
        let content =
            service.simplify_with(constants::SAMPLE_DOCUMENT_TEXT, &TermDictionary::builtin());

        let originals: Vec<&str> = content
            .matches()
            .iter()
            .map(|span| span.term.original.as_str())
            .collect();
        assert_eq!(
            originals,
            vec![
                "dyspnea",
                "tachycardia",
                "bilateral lower extremity edema",
                "congestive heart failure",
                "exacerbation",
            ]
        );
        assert_eq!(
            content.substituted_text(),
            "The patient presents with difficulty breathing, fast heart rate, and swelling in both \
             legs, consistent with heart weakness causing fluid buildup worsening."
        );
    }

    #[test]
    fn test_simplify_with_no_terms() {
        let content = SimplifierService::new().simplify("Patient has dyspnea.", Vec::new());
        assert!(!content.has_terms());
        assert_eq!(content.substituted_text(), "Patient has dyspnea.");
    }

    #[test]
    fn test_simplify_skips_malformed_terms() {
        let content = SimplifierService::new().simplify(
            "Patient has dyspnea.",
            vec![
                TermRecord::new("", "broken", "", None),
                TermRecord::new("dyspnea", "difficulty breathing", "", None),
            ],
        );
        assert_eq!(content.matches().len(), 1);
    }
}
