//! Uploaded image payloads.
//!
//! Images arrive base64-encoded, either bare or as a `data:<mime>;base64,<data>` URL. They are
//! validated before any provider call so a malformed upload is reported to the caller instead
//! of silently degrading to fallback content.

use crate::{ProviderError, ProviderResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    base64: String,
    mime_type: Option<String>,
    byte_len: usize,
}

impl ImagePayload {
    /// Parse and validate a base64 image, optionally wrapped in a data URL.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidImage` if the payload is empty, the data URL is malformed
    /// or the content is not valid base64.
    pub fn parse(input: &str) -> ProviderResult<Self> {
        let input = input.trim();

        let (mime_type, data) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest.split_once(',').ok_or_else(|| {
                    ProviderError::InvalidImage("data URL is missing its ',' separator".into())
                })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| {
                    ProviderError::InvalidImage("data URL must be base64-encoded".into())
                })?;
                let mime = (!mime.is_empty()).then(|| mime.to_string());
                (mime, data.trim())
            }
            None => (None, input),
        };

        if data.is_empty() {
            return Err(ProviderError::InvalidImage("image payload is empty".into()));
        }

        let decoded = STANDARD
            .decode(data)
            .map_err(|e| ProviderError::InvalidImage(format!("base64 decode error: {}", e)))?;

        Ok(Self {
            base64: data.to_string(),
            mime_type,
            byte_len: decoded.len(),
        })
    }

    /// The base64 content without any data URL header.
    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Size of the decoded image in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_base64() {
        let payload = ImagePayload::parse("aGVsbG8=").unwrap();
        assert_eq!(payload.as_base64(), "aGVsbG8=");
        assert_eq!(payload.byte_len(), 5);
        assert!(payload.mime_type().is_none());
    }

    #[test]
    fn test_parse_data_url() {
        let payload = ImagePayload::parse("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(payload.mime_type(), Some("image/png"));
        assert_eq!(payload.as_base64(), "aGVsbG8=");
    }

    #[test]
    fn test_rejects_empty_payload() {
        assert!(matches!(
            ImagePayload::parse("  "),
            Err(ProviderError::InvalidImage(_))
        ));
        assert!(matches!(
            ImagePayload::parse("data:image/png;base64,"),
            Err(ProviderError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_base64() {
        assert!(matches!(
            ImagePayload::parse("not base64!"),
            Err(ProviderError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_rejects_non_base64_data_url() {
        assert!(matches!(
            ImagePayload::parse("data:text/plain,hello"),
            Err(ProviderError::InvalidImage(_))
        ));
        assert!(matches!(
            ImagePayload::parse("data:image/png;base64"),
            Err(ProviderError::InvalidImage(_))
        ));
    }
}
