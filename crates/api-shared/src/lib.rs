//! # API Shared
//!
//! Request and response types for the MedSimplify REST API.
//!
//! Contains:
//! - JSON bodies with OpenAPI schemas (`utoipa::ToSchema`)
//! - Shared services like `HealthService`
//!
//! Offsets in these types count Unicode scalar values, not bytes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod health;

pub use health::HealthService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Pasted text to simplify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SimplifyReq {
    pub text: String,
    /// Session whose saved terms are marked in `annotated_html`.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Base64 image (bare or as a data URL) of a document to simplify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SimplifyImageReq {
    pub image: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// One occurrence of a term in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MatchDto {
    pub start: usize,
    pub end: usize,
    /// The source text at `start..end`, in its original casing.
    pub text: String,
    pub term_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Text,
    Term,
}

/// A piece of the annotated view. Concatenating every `text` yields the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SegmentDto {
    pub kind: SegmentKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_key: Option<String>,
    #[serde(default)]
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TermDto {
    pub term_key: String,
    pub original: String,
    pub simplified: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_link: Option<String>,
    #[serde(default)]
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SimplifyRes {
    pub source_text: String,
    /// `live` or `fallback`.
    pub provenance: String,
    /// `unconfigured` or the provider failure, when `provenance` is `fallback`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub terms_count: usize,
    pub matches: Vec<MatchDto>,
    pub segments: Vec<SegmentDto>,
    pub substituted_text: String,
    pub substituted_html: String,
    pub annotated_html: String,
    pub terms: Vec<TermDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionRes {
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GlossaryRes {
    pub session_id: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GlossaryEntryRes {
    pub term_key: String,
    pub saved: bool,
}
