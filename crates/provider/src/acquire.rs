//! Acquisition of source text and terms.
//!
//! [`TermAcquirer`] asks the remote provider when one is configured and falls back to offline
//! answers otherwise. Acquisition never fails on provider trouble; instead the returned
//! [`Provenance`] tells the caller whether the content is live, and if not, why.

use crate::config::ProviderConfig;
use crate::image::ImagePayload;
use crate::offline::{offline_image, offline_text};
use crate::remote::RemoteProvider;
use crate::ProviderResult;
use medsimplify_core::{TermDictionary, TermRecord};
use std::fmt;

/// Source text and the terms reported for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AcquiredContent {
    pub source_text: String,
    pub terms: Vec<TermRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No API key was configured.
    Unconfigured,
    /// The provider was called and the call failed.
    ProviderFailed(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Unconfigured => write!(f, "unconfigured"),
            FallbackReason::ProviderFailed(message) => write!(f, "{}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Live,
    Fallback(FallbackReason),
}

impl Provenance {
    /// `live` or `fallback`.
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Live => "live",
            Provenance::Fallback(_) => "fallback",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Provenance::Live)
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Provenance::Live => None,
            Provenance::Fallback(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub content: AcquiredContent,
    pub provenance: Provenance,
}

pub struct TermAcquirer {
    remote: Option<RemoteProvider>,
    fallback: TermDictionary,
}

impl TermAcquirer {
    /// Creates an acquirer for `config`, answering offline from `fallback` when needed.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig, fallback: TermDictionary) -> ProviderResult<Self> {
        let remote = RemoteProvider::from_config(config)?;
        if remote.is_none() {
            tracing::info!("no provider API key configured; using offline term lookup");
        }
        Ok(Self { remote, fallback })
    }

    /// An acquirer that never calls a remote provider.
    pub fn offline(fallback: TermDictionary) -> Self {
        Self {
            remote: None,
            fallback,
        }
    }

    pub fn fallback_dictionary(&self) -> &TermDictionary {
        &self.fallback
    }

    pub fn is_live(&self) -> bool {
        self.remote.is_some()
    }

    /// Acquires the terms of pasted text.
    pub async fn acquire_text(&self, text: &str) -> Acquisition {
        let Some(remote) = &self.remote else {
            return Acquisition {
                content: offline_text(&self.fallback, text),
                provenance: Provenance::Fallback(FallbackReason::Unconfigured),
            };
        };

        match remote.simplify_text(text).await {
            Ok(content) => Acquisition {
                content,
                provenance: Provenance::Live,
            },
            Err(e) => {
                tracing::warn!("provider text request failed, using offline lookup: {}", e);
                Acquisition {
                    content: offline_text(&self.fallback, text),
                    provenance: Provenance::Fallback(FallbackReason::ProviderFailed(
                        e.to_string(),
                    )),
                }
            }
        }
    }

    /// Acquires the text and terms of an uploaded document image.
    pub async fn acquire_image(&self, image: &ImagePayload) -> Acquisition {
        let Some(remote) = &self.remote else {
            return Acquisition {
                content: offline_image(),
                provenance: Provenance::Fallback(FallbackReason::Unconfigured),
            };
        };

        match remote.process_image(image).await {
            Ok(content) => Acquisition {
                content,
                provenance: Provenance::Live,
            },
            Err(e) => {
                tracing::warn!("provider image request failed, using sample document: {}", e);
                Acquisition {
                    content: offline_image(),
                    provenance: Provenance::Fallback(FallbackReason::ProviderFailed(
                        e.to_string(),
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use medsimplify_core::constants::SAMPLE_DOCUMENT_TEXT;
    use serde_json::json;
    use std::time::Duration;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn live_acquirer(base_url: &str) -> TermAcquirer {
        let config =
            ProviderConfig::new(base_url, Some("key".into()), Duration::from_secs(5)).unwrap();
        TermAcquirer::new(&config, TermDictionary::builtin()).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_falls_back_to_dictionary() {
        let config = ProviderConfig::from_env_values(None, None, None).unwrap();
        let acquirer = TermAcquirer::new(&config, TermDictionary::builtin()).unwrap();
        assert!(!acquirer.is_live());

        let acquisition = acquirer.acquire_text("Known hypertension.").await;
        assert_eq!(
            acquisition.provenance,
            Provenance::Fallback(FallbackReason::Unconfigured)
        );
        assert_eq!(acquisition.content.source_text, "Known hypertension.");
        assert_eq!(acquisition.content.terms.len(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_image_returns_sample_document() {
        let acquirer = TermAcquirer::offline(TermDictionary::builtin());
        let image = ImagePayload::parse("aGVsbG8=").unwrap();
        let acquisition = acquirer.acquire_image(&image).await;
        assert_eq!(acquisition.content.source_text, SAMPLE_DOCUMENT_TEXT);
        assert_eq!(acquisition.content.terms.len(), 5);
        assert!(!acquisition.provenance.is_live());
    }

    #[tokio::test]
    async fn test_live_provider_result_is_used() {
        let router = Router::new().route(
            "/simplify",
            post(|| async {
                Json(json!({
                    "success": true,
                    "data": {
                        "sourceText": "Patient has dyspnea.",
                        "terms": [{"id": "1", "term": "dyspnea", "simplified": "breathlessness"}]
                    }
                }))
            }),
        );
        let acquirer = live_acquirer(&spawn_stub(router).await);

        let acquisition = acquirer.acquire_text("Patient has dyspnea.").await;
        assert!(acquisition.provenance.is_live());
        assert_eq!(acquisition.content.terms[0].simplified, "breathlessness");
    }

    #[tokio::test]
    async fn test_failed_call_is_distinct_from_unconfigured() {
        let router = Router::new().route(
            "/simplify",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let acquirer = live_acquirer(&spawn_stub(router).await);

        let acquisition = acquirer.acquire_text("Patient has dyspnea.").await;
        match acquisition.provenance.fallback_reason() {
            Some(FallbackReason::ProviderFailed(message)) => assert!(message.contains("500")),
            other => panic!("expected ProviderFailed, got {other:?}"),
        }
        let originals: Vec<&str> = acquisition
            .content
            .terms
            .iter()
            .map(|t| t.original.as_str())
            .collect();
        assert_eq!(originals, vec!["dyspnea"]);
    }

    #[tokio::test]
    async fn test_failed_image_call_returns_sample_document() {
        let router = Router::new().route(
            "/process-image",
            post(|| async { Json(json!({"success": false, "error": "unreadable image"})) }),
        );
        let acquirer = live_acquirer(&spawn_stub(router).await);
        let image = ImagePayload::parse("aGVsbG8=").unwrap();

        let acquisition = acquirer.acquire_image(&image).await;
        assert_eq!(acquisition.content.source_text, SAMPLE_DOCUMENT_TEXT);
        assert!(matches!(
            acquisition.provenance,
            Provenance::Fallback(FallbackReason::ProviderFailed(ref m)) if m.contains("unreadable image")
        ));
    }

    #[test]
    fn test_provenance_labels() {
        assert_eq!(Provenance::Live.label(), "live");
        assert!(Provenance::Live.fallback_reason().is_none());

        let unconfigured = Provenance::Fallback(FallbackReason::Unconfigured);
        assert_eq!(unconfigured.label(), "fallback");
        assert_eq!(
            unconfigured.fallback_reason().map(ToString::to_string).as_deref(),
            Some("unconfigured")
        );

        let failed = FallbackReason::ProviderFailed("provider returned status 503: down".into());
        assert_eq!(failed.to_string(), "provider returned status 503: down");
    }
}
