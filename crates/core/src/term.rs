//! Term records: the unit of knowledge the matcher looks for.

use medsimplify_types::TermKey;
use serde::{Deserialize, Serialize};

/// A medical term paired with its plain-language explanation.
///
/// `original` is the surface form searched for in text (compared case-insensitively).
/// Records arriving from a provider are accepted as-is; malformed ones (an empty `original`) are
/// dropped when a [`TermDictionary`](crate::dictionary::TermDictionary) is built or a match pass
/// runs, never rejected at deserialisation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    #[serde(alias = "term")]
    pub original: String,
    pub simplified: String,
    #[serde(default)]
    pub definition: String,
    #[serde(
        default,
        alias = "referenceLink",
        alias = "wikiLink",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_link: Option<String>,
}

impl TermRecord {
    pub fn new(
        original: impl Into<String>,
        simplified: impl Into<String>,
        definition: impl Into<String>,
        reference_link: Option<String>,
    ) -> Self {
        Self {
            original: original.into(),
            simplified: simplified.into(),
            definition: definition.into(),
            reference_link,
        }
    }

    /// The case-normalised identity used by the session glossary.
    pub fn key(&self) -> TermKey {
        TermKey::new(&self.original)
    }

    /// Length of the trimmed `original` in characters; the matcher's precedence order.
    pub(crate) fn match_len(&self) -> usize {
        self.original.trim().chars().count()
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        !self.original.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_accepts_provider_field_names() {
        let json = r#"{
            "term": "dyspnea",
            "simplified": "difficulty breathing",
            "definition": "Shortness of breath.",
            "wikiLink": "https://en.wikipedia.org/wiki/Dyspnea"
        }"#;
        let record: TermRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.original, "dyspnea");
        assert_eq!(
            record.reference_link.as_deref(),
            Some("https://en.wikipedia.org/wiki/Dyspnea")
        );
    }

    #[test]
    fn test_definition_and_link_are_optional() {
        let record: TermRecord =
            serde_json::from_str(r#"{"original": "edema", "simplified": "swelling"}"#).unwrap();
        assert!(record.definition.is_empty());
        assert!(record.reference_link.is_none());
    }

    #[test]
    fn test_key_ignores_case() {
        let record = TermRecord::new("Tachycardia", "fast heart rate", "", None);
        assert_eq!(record.key(), TermKey::new("tachycardia"));
    }

    #[test]
    fn test_blank_original_is_malformed() {
        assert!(!TermRecord::new("  ", "x", "", None).is_well_formed());
        assert!(TermRecord::new("MRI", "scan", "", None).is_well_formed());
    }
}
