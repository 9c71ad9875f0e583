//! Constants used throughout the MedSimplify core crate.
//!
//! Holds the built-in term list and the CSS class names emitted by the HTML renderers, so that
//! the display layer and the renderer agree on a single spelling.

use std::time::Duration;

/// CSS class wrapping a highlighted medical term in the annotated view.
pub const HIGHLIGHT_TERM_CLASS: &str = "highlight-medical";

/// CSS class wrapping a substituted plain-language phrase in the substituted view.
pub const HIGHLIGHT_DEFINITION_CLASS: &str = "highlight-definition";

/// How long a session may go unused before it expires.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Base URL for reference links on built-in terms.
pub const REFERENCE_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

/// A built-in dictionary row: original, simplified, definition, reference article.
pub type BuiltinTerm = (&'static str, &'static str, &'static str, &'static str);

/// Terms available without a remote provider.
pub const BUILTIN_TERMS: &[BuiltinTerm] = &[
    (
        "dyspnea",
        "difficulty breathing",
        "Shortness of breath or breathing discomfort. It can range from mild to severe and may occur during rest or activity.",
        "Dyspnea",
    ),
    (
        "tachycardia",
        "fast heart rate",
        "A heart rate that exceeds the normal resting rate, generally over 100 beats per minute in adults.",
        "Tachycardia",
    ),
    (
        "bilateral lower extremity edema",
        "swelling in both legs",
        "Swelling caused by fluid accumulation in both legs or feet, often due to heart or kidney problems.",
        "Edema",
    ),
    (
        "congestive heart failure",
        "heart weakness causing fluid buildup",
        "A chronic condition where the heart doesn't pump blood as well as it should, causing fluid to back up in the lungs and other body tissues.",
        "Heart_failure",
    ),
    (
        "exacerbation",
        "worsening",
        "A worsening of a disease or its symptoms. It refers to an increase in the severity of a disease or its signs and symptoms.",
        "Exacerbation",
    ),
    (
        "hypertension",
        "high blood pressure",
        "A long-term condition in which the pressure of blood against the artery walls is consistently too high.",
        "Hypertension",
    ),
    (
        "diabetes mellitus",
        "diabetes",
        "A group of conditions in which blood sugar stays too high because the body makes too little insulin or cannot use it well.",
        "Diabetes",
    ),
    (
        "myocardial infarction",
        "heart attack",
        "Damage to part of the heart muscle caused by a blocked blood supply.",
        "Myocardial_infarction",
    ),
    (
        "cerebrovascular accident",
        "stroke",
        "Sudden loss of brain function caused by a blocked or burst blood vessel in the brain.",
        "Stroke",
    ),
    (
        "edema",
        "swelling",
        "Build-up of fluid in the body's tissues, most often noticed in the legs, ankles or feet.",
        "Edema",
    ),
];

/// Sample document returned when an image cannot be sent to a live provider.
pub const SAMPLE_DOCUMENT_TEXT: &str = "The patient presents with dyspnea, tachycardia, and bilateral lower extremity edema, consistent with congestive heart failure exacerbation.";
