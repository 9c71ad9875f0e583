//! HTTP client for the remote term provider.
//!
//! Endpoints (relative to the configured base URL):
//! - `POST /simplify` with `{"text": ...}`
//! - `POST /process-image` with `{"image": <base64>}`
//!
//! Both authenticate with `Authorization: Bearer <api key>` and answer with an
//! [`ApiResponse`](crate::wire::ApiResponse).

use crate::acquire::AcquiredContent;
use crate::config::ProviderConfig;
use crate::image::ImagePayload;
use crate::wire::{ApiResponse, ProcessImageReq, SimplifyTextReq};
use crate::{ProviderError, ProviderResult};
use medsimplify_core::TermRecord;
use serde::Serialize;

pub struct RemoteProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RemoteProvider {
    /// Create a client for the configured provider.
    ///
    /// Returns `Ok(None)` if the configuration has no API key.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &ProviderConfig) -> ProviderResult<Option<Self>> {
        let Some(api_key) = config.api_key() else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Some(Self {
            client,
            base_url: config.base_url().to_string(),
            api_key: api_key.to_string(),
        }))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Ask the provider to find the terms in `text`.
    ///
    /// If the provider answers with an empty `sourceText`, the submitted text is kept.
    pub async fn simplify_text(&self, text: &str) -> ProviderResult<AcquiredContent> {
        let mut content = self
            .post("simplify", &SimplifyTextReq { text })
            .await?;
        if content.source_text.is_empty() {
            content.source_text = text.to_string();
        }
        Ok(content)
    }

    /// Ask the provider to extract text and terms from an image.
    pub async fn process_image(&self, image: &ImagePayload) -> ProviderResult<AcquiredContent> {
        self.post(
            "process-image",
            &ProcessImageReq {
                image: image.as_base64(),
            },
        )
        .await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ProviderResult<AcquiredContent> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let payload: ApiResponse = response.json().await?;
        if !payload.success {
            return Err(ProviderError::Upstream(
                payload
                    .error
                    .unwrap_or_else(|| "provider did not report a reason".into()),
            ));
        }

        let data = payload.data.unwrap_or_default();
        Ok(AcquiredContent {
            source_text: data.source_text,
            terms: data.terms.into_iter().map(TermRecord::from).collect(),
        })
    }
}
