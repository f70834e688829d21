//! Error types.

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported manifest media type: {0:?}")]
    UnsupportedMediaType(String),
    #[error("JSON representation not initialized in deserialized manifest")]
    UninitializedRepresentation,
    #[error("manifest media type already registered: {0}")]
    DuplicateRegistration(String),
    #[error("invalid digest: {0:?}")]
    InvalidDigest(String),
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),
}
