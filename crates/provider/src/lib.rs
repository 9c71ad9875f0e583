//! # MedSimplify Provider
//!
//! Acquisition of text and term lists from an external provider.
//!
//! The provider is an opaque service: given pasted text or an image of a document, it returns
//! the document text and the medical terms it recognised. This crate handles:
//! - provider configuration resolved at startup ([`config`])
//! - the HTTP client for the remote provider ([`remote`]) and its wire format ([`wire`])
//! - offline answers used when the remote provider is unconfigured or failing ([`offline`])
//! - validation of uploaded images ([`image`])
//! - the acquisition step itself, which always produces usable content and reports where it
//!   came from ([`acquire`])
//!
//! Matching and rendering are not done here; results are handed to `medsimplify-core`.

pub mod acquire;
pub mod config;
pub mod image;
pub mod offline;
pub mod remote;
pub mod wire;

pub use acquire::{AcquiredContent, Acquisition, FallbackReason, Provenance, TermAcquirer};
pub use config::ProviderConfig;
pub use image::ImagePayload;
pub use remote::RemoteProvider;

/// Errors returned by the provider crate.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider reported failure: {0}")]
    Upstream(String),
    #[error("invalid image payload: {0}")]
    InvalidImage(String),
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
