//! Dual renderer.
//!
//! Derives two views from one match pass over a text:
//!
//! - the **annotated view**: the text split into plain and term segments, in document order,
//!   with each term segment carrying its [`TermRecord`]. Concatenating the segments reproduces
//!   the source text byte for byte.
//! - the **substituted view**: each matched term replaced by its simplified phrase.
//!
//! Both views are also available as HTML fragments. Every piece of text that reaches HTML output
//! (source text, simplified phrases and attribute values alike) is escaped first, so neither the
//! document nor the dictionary can inject markup.

use crate::constants::{HIGHLIGHT_DEFINITION_CLASS, HIGHLIGHT_TERM_CLASS};
use crate::glossary::SessionGlossary;
use crate::matcher::{find_matches, MatchSpan};
use crate::term::TermRecord;
use medsimplify_types::TermKey;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// One piece of the annotated view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment<'a> {
    /// Text that matched no term.
    Text { text: &'a str },
    /// A matched term, as spelled in the source text.
    Term {
        text: &'a str,
        term_key: TermKey,
        term: &'a TermRecord,
    },
}

impl Segment<'_> {
    pub fn text(&self) -> &str {
        match self {
            Segment::Text { text } | Segment::Term { text, .. } => text,
        }
    }
}

/// A source text together with the matches found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    source_text: String,
    matches: Vec<MatchSpan>,
}

impl RenderedContent {
    /// Runs the matcher over `source_text` and keeps the result.
    pub fn build(source_text: impl Into<String>, candidates: &[Arc<TermRecord>]) -> Self {
        let source_text = source_text.into();
        let matches = find_matches(&source_text, candidates);
        Self {
            source_text,
            matches,
        }
    }

    /// Wraps externally produced matches.
    ///
    /// Matches are sorted by start offset; any span that is empty, out of range, not on a `char`
    /// boundary or overlapping an earlier span is dropped, so the annotated view always covers
    /// the text exactly once.
    pub fn new(source_text: impl Into<String>, mut matches: Vec<MatchSpan>) -> Self {
        let source_text = source_text.into();
        matches.sort_by_key(|span| (span.start, std::cmp::Reverse(span.end)));

        let mut accepted: Vec<MatchSpan> = Vec::with_capacity(matches.len());
        for span in matches {
            let fits = span.start < span.end
                && source_text.get(span.start..span.end).is_some();
            let clear = accepted.last().map_or(true, |last| last.end <= span.start);
            if fits && clear {
                accepted.push(span);
            } else {
                tracing::debug!(
                    "dropping match {}..{} for {:?}",
                    span.start,
                    span.end,
                    span.term.original
                );
            }
        }

        Self {
            source_text,
            matches: accepted,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Matches ordered by start offset.
    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    pub fn has_terms(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Distinct matched records, in order of first appearance.
    pub fn distinct_terms(&self) -> Vec<Arc<TermRecord>> {
        let mut seen = HashSet::new();
        self.matches
            .iter()
            .filter(|span| seen.insert(span.term.key()))
            .map(|span| Arc::clone(&span.term))
            .collect()
    }

    /// Number of distinct terms found.
    pub fn terms_count(&self) -> usize {
        self.distinct_terms().len()
    }

    /// The annotated view.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let text = self.source_text.as_str();
        let mut segments = Vec::with_capacity(self.matches.len() * 2 + 1);
        let mut cursor = 0;

        for span in &self.matches {
            if span.start > cursor {
                segments.push(Segment::Text {
                    text: &text[cursor..span.start],
                });
            }
            segments.push(Segment::Term {
                text: &text[span.start..span.end],
                term_key: span.term.key(),
                term: span.term.as_ref(),
            });
            cursor = span.end;
        }

        if cursor < text.len() {
            segments.push(Segment::Text {
                text: &text[cursor..],
            });
        }

        segments
    }

    /// The substituted view as plain text.
    pub fn substituted_text(&self) -> String {
        self.substitute(|out, piece| out.push_str(piece), |out, record| {
            out.push_str(&record.simplified)
        })
    }

    /// The substituted view as an HTML fragment, each phrase wrapped in a highlight span.
    pub fn substituted_html(&self) -> String {
        self.substitute(escape_html_into, |out, record| {
            out.push_str("<span class=\"");
            out.push_str(HIGHLIGHT_DEFINITION_CLASS);
            out.push_str("\">");
            escape_html_into(out, &record.simplified);
            out.push_str("</span>");
        })
    }

    /// The annotated view as an HTML fragment.
    ///
    /// Each term keeps its source spelling and is wrapped in a span carrying everything a
    /// pop-over needs: `data-term-key`, `data-simplified`, and `data-definition` and
    /// `data-reference-link` when the record has them. When a glossary is supplied, terms it has
    /// saved get `data-saved="true"`.
    pub fn annotated_html(&self, glossary: Option<&SessionGlossary>) -> String {
        let mut out = String::with_capacity(self.source_text.len() * 2);
        for segment in self.segments() {
            match segment {
                Segment::Text { text } => escape_html_into(&mut out, text),
                Segment::Term {
                    text,
                    term_key,
                    term,
                } => {
                    out.push_str("<span class=\"");
                    out.push_str(HIGHLIGHT_TERM_CLASS);
                    out.push_str("\" data-term-key=\"");
                    escape_html_into(&mut out, term_key.as_str());
                    out.push_str("\" data-simplified=\"");
                    escape_html_into(&mut out, &term.simplified);
                    out.push('"');
                    if !term.definition.is_empty() {
                        out.push_str(" data-definition=\"");
                        escape_html_into(&mut out, &term.definition);
                        out.push('"');
                    }
                    if let Some(link) = &term.reference_link {
                        out.push_str(" data-reference-link=\"");
                        escape_html_into(&mut out, link);
                        out.push('"');
                    }
                    if glossary.is_some_and(|g| g.is_saved(term_key.as_str())) {
                        out.push_str(" data-saved=\"true\"");
                    }
                    out.push('>');
                    escape_html_into(&mut out, text);
                    out.push_str("</span>");
                }
            }
        }
        out
    }

    fn substitute(
        &self,
        mut plain: impl FnMut(&mut String, &str),
        mut term: impl FnMut(&mut String, &TermRecord),
    ) -> String {
        let text = self.source_text.as_str();
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        for span in &self.matches {
            plain(&mut out, &text[cursor..span.start]);
            term(&mut out, span.term.as_ref());
            cursor = span.end;
        }
        plain(&mut out, &text[cursor..]);

        out
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use in HTML text and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    escape_html_into(&mut out, input);
    out
}

fn escape_html_into(out: &mut String, input: &str) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::TermDictionary;

    fn dictionary() -> TermDictionary {
        TermDictionary::from_records(vec![
            TermRecord::new("dyspnea", "difficulty breathing", "Shortness of breath.", None),
            TermRecord::new("tachycardia", "fast heart rate", "Fast pulse.", None),
        ])
    }

    fn concat(segments: &[Segment<'_>]) -> String {
        segments.iter().map(Segment::text).collect()
    }

    #[test]
    fn test_end_to_end_substitution() {
        let content =
            RenderedContent::build("Patient has dyspnea and tachycardia.", dictionary().records());
        assert_eq!(content.matches().len(), 2);
        assert_eq!(
            content.substituted_text(),
            "Patient has difficulty breathing and fast heart rate."
        );
    }

    #[test]
    fn test_segments_cover_text_exactly() {
        let texts = [
            "Patient has dyspnea and tachycardia.",
            "dyspnea",
            "dyspnea tachycardia",
            "Nothing to see here.",
            "",
            "Tachycardia!",
        ];
        for text in texts {
            let content = RenderedContent::build(text, dictionary().records());
            assert_eq!(concat(&content.segments()), text);
        }
    }

    #[test]
    fn test_segments_preserve_source_casing() {
        let content = RenderedContent::build("DYSPNEA noted; Dyspnea persists.", dictionary().records());
        let terms: Vec<(&str, &str)> = content
            .segments()
            .iter()
            .filter_map(|segment| match segment {
                Segment::Term { text, term, .. } => Some((*text, term.original.as_str())),
                Segment::Text { .. } => None,
            })
            .collect();
        assert_eq!(terms, vec![("DYSPNEA", "dyspnea"), ("Dyspnea", "dyspnea")]);
    }

    #[test]
    fn test_no_matches_is_passthrough() {
        let text = "The patient is comfortable & resting <quietly>.";
        let content = RenderedContent::build(text, dictionary().records());
        assert!(!content.has_terms());
        assert_eq!(content.substituted_text(), text);
        assert_eq!(
            content.segments(),
            vec![Segment::Text { text }]
        );
        assert_eq!(content.terms_count(), 0);
    }

    #[test]
    fn test_empty_dictionary_is_passthrough() {
        let text = "Patient has dyspnea.";
        let content = RenderedContent::build(text, &[]);
        assert!(content.matches().is_empty());
        assert_eq!(content.substituted_text(), text);
    }

    #[test]
    fn test_substituted_html_escapes_text_and_phrases() {
        let dictionary = TermDictionary::from_records(vec![TermRecord::new(
            "dyspnea",
            "<b>hard</b> breathing",
            "",
            None,
        )]);
        let content = RenderedContent::build("a < b & dyspnea", dictionary.records());
        assert_eq!(
            content.substituted_html(),
            "a &lt; b &amp; <span class=\"highlight-definition\">&lt;b&gt;hard&lt;/b&gt; breathing</span>"
        );
    }

    #[test]
    fn test_annotated_html_escapes_and_marks_saved_terms() {
        let dictionary = TermDictionary::from_records(vec![
            TermRecord::new("dyspnea", "difficulty \"breathing\"", "", None),
            TermRecord::new("tachycardia", "fast heart rate", "", None),
        ]);
        let content =
            RenderedContent::build("<p>Dyspnea, tachycardia</p>", dictionary.records());
        let glossary = SessionGlossary::new();
        glossary.save("DYSPNEA");

        let html = content.annotated_html(Some(&glossary));
        assert_eq!(
            html,
            "&lt;p&gt;<span class=\"highlight-medical\" data-term-key=\"dyspnea\" \
             data-simplified=\"difficulty &quot;breathing&quot;\" data-saved=\"true\">Dyspnea</span>, \
             <span class=\"highlight-medical\" data-term-key=\"tachycardia\" \
             data-simplified=\"fast heart rate\">tachycardia</span>&lt;/p&gt;"
        );
    }

    #[test]
    fn test_annotated_html_carries_definition_and_reference_link() {
        let dictionary = TermDictionary::from_records(vec![TermRecord::new(
            "edema",
            "swelling",
            "Fluid in \"tissues\" & joints.",
            Some("https://en.wikipedia.org/wiki/Edema?a=1&b=2".into()),
        )]);
        let content = RenderedContent::build("Mild edema.", dictionary.records());
        assert_eq!(
            content.annotated_html(None),
            "Mild <span class=\"highlight-medical\" data-term-key=\"edema\" \
             data-simplified=\"swelling\" data-definition=\"Fluid in &quot;tissues&quot; &amp; joints.\" \
             data-reference-link=\"https://en.wikipedia.org/wiki/Edema?a=1&amp;b=2\">edema</span>."
        );
    }

    #[test]
    fn test_large_mixed_input_segments_cover_text() {
        let chunk = "Bilateral Lower Extremity EDEMA with edema_x, xedema, Öedema and (edema); \
                     Ödème, Straße, congestive heart failure exacerbation. \
                     Dyspnea/tachycardia: hypertension? ";
        let repeats = 5_000;
        let text = chunk.repeat(repeats);
        let dictionary = TermDictionary::builtin();

        let content = RenderedContent::build(text.as_str(), dictionary.records());

        assert_eq!(concat(&content.segments()), text);
        for pair in content.matches().windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        // Per chunk: the nested edema phrase, "(edema)", congestive heart failure, exacerbation,
        // dyspnea, tachycardia and hypertension. Glued and non-ASCII-adjacent edemas never match.
        assert_eq!(content.matches().len(), 7 * repeats);
        let originals: Vec<&str> = content.matches()[..7]
            .iter()
            .map(|span| span.term.original.as_str())
            .collect();
        assert_eq!(
            originals,
            vec![
                "bilateral lower extremity edema",
                "edema",
                "congestive heart failure",
                "exacerbation",
                "dyspnea",
                "tachycardia",
                "hypertension",
            ]
        );
    }

    #[test]
    fn test_term_with_markup_characters_matches_literally() {
        let dictionary =
            TermDictionary::from_records(vec![TermRecord::new("<i>", "italic tag", "", None)]);
        let content = RenderedContent::build("see <i> here", dictionary.records());
        assert_eq!(content.matches().len(), 1);
        assert!(content.annotated_html(None).contains(">&lt;i&gt;</span>"));
    }

    #[test]
    fn test_distinct_terms_in_first_appearance_order() {
        let content = RenderedContent::build(
            "tachycardia, dyspnea, Tachycardia",
            dictionary().records(),
        );
        let originals: Vec<String> = content
            .distinct_terms()
            .iter()
            .map(|record| record.original.clone())
            .collect();
        assert_eq!(originals, vec!["tachycardia", "dyspnea"]);
        assert_eq!(content.terms_count(), 2);
        assert_eq!(content.matches().len(), 3);
    }

    #[test]
    fn test_new_drops_invalid_and_overlapping_spans() {
        let record = Arc::new(TermRecord::new("heart", "x", "", None));
        let span = |start, end| MatchSpan {
            term: Arc::clone(&record),
            start,
            end,
        };
        let text = "héart heart";
        let content = RenderedContent::new(
            text,
            vec![span(7, 12), span(0, 2), span(1, 3), span(8, 10), span(20, 25), span(3, 3)],
        );

        // 0..2 splits 'é', 3..3 is empty, 20..25 is out of range and 8..10 overlaps 7..12.
        let kept: Vec<(usize, usize)> = content.matches().iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(kept, vec![(1, 3), (7, 12)]);
        assert_eq!(concat(&content.segments()), text);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
