use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("failed to read dictionary file: {0}")]
    DictionaryRead(std::io::Error),
    #[error("failed to parse dictionary: {0}")]
    DictionaryParse(serde_json::Error),
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
