use thiserror::Error;

/// Result type for key-value backend and link store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Failures of the external key-value backend.
///
/// This is the only fault in the system: callers must surface it as a
/// server error and never confuse it with a missing link.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage backend returned invalid data: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Rejected inputs to link creation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("url cannot be empty")]
    EmptyUrl,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid slug: {0}")]
    InvalidSlug(String),
    #[error("invalid expiration: {0}")]
    InvalidExpiration(String),
}

/// A stored value that does not describe a valid link record.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed link json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored url is empty")]
    EmptyUrl,
    #[error("invalid {field} timestamp {millis}: {reason}")]
    Timestamp {
        field: &'static str,
        millis: i64,
        reason: String,
    },
    #[error("password fields disagree with passwordProtected={protected}")]
    InconsistentPassword { protected: bool },
}
