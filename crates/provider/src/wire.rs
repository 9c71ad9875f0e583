//! JSON wire format of the remote term provider.

use medsimplify_core::TermRecord;
use serde::{Deserialize, Serialize};

/// One term as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTerm {
    #[serde(default)]
    pub id: String,
    pub term: String,
    pub simplified: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_link: Option<String>,
}

impl From<ApiTerm> for TermRecord {
    fn from(term: ApiTerm) -> Self {
        TermRecord::new(term.term, term.simplified, term.definition, term.wiki_link)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiData {
    #[serde(default)]
    pub terms: Vec<ApiTerm>,
    #[serde(default)]
    pub source_text: String,
}

/// Envelope of every provider response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ApiData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SimplifyTextReq<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProcessImageReq<'a> {
    pub image: &'a str,
}
