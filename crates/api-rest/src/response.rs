//! Conversion of rendered content into REST response bodies.

use api_shared::{MatchDto, SegmentDto, SegmentKind, SimplifyRes, TermDto};
use medsimplify_core::{RenderedContent, Segment, SessionGlossary};
use medsimplify_provider::Provenance;

pub(crate) fn simplify_res(
    content: &RenderedContent,
    provenance: &Provenance,
    glossary: Option<&SessionGlossary>,
) -> SimplifyRes {
    let source = content.source_text();
    let is_saved = |key: &str| glossary.is_some_and(|g| g.is_saved(key));

    let matches = content
        .matches()
        .iter()
        .map(|span| {
            let range = span.char_range(source);
            MatchDto {
                start: range.start,
                end: range.end,
                text: span.matched(source).to_string(),
                term_key: span.term.key().to_string(),
            }
        })
        .collect();

    let segments = content
        .segments()
        .into_iter()
        .map(|segment| match segment {
            Segment::Text { text } => SegmentDto {
                kind: SegmentKind::Text,
                text: text.to_string(),
                term_key: None,
                saved: false,
            },
            Segment::Term { text, term_key, .. } => SegmentDto {
                kind: SegmentKind::Term,
                text: text.to_string(),
                saved: is_saved(term_key.as_str()),
                term_key: Some(term_key.to_string()),
            },
        })
        .collect();

    let terms = content
        .distinct_terms()
        .into_iter()
        .map(|record| {
            let term_key = record.key().to_string();
            TermDto {
                saved: is_saved(&term_key),
                term_key,
                original: record.original.clone(),
                simplified: record.simplified.clone(),
                definition: record.definition.clone(),
                reference_link: record.reference_link.clone(),
            }
        })
        .collect();

    SimplifyRes {
        source_text: source.to_string(),
        provenance: provenance.label().into(),
        fallback_reason: provenance.fallback_reason().map(ToString::to_string),
        terms_count: content.terms_count(),
        matches,
        segments,
        substituted_text: content.substituted_text(),
        substituted_html: content.substituted_html(),
        annotated_html: content.annotated_html(glossary),
        terms,
    }
}
