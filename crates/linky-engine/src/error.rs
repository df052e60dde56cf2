use linky_core::{StorageError, ValidationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkError>;

#[derive(Debug, Clone, Error)]
pub enum LinkError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("operation requires the privileged secret")]
    Forbidden,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl From<crate::password::HashError> for LinkError {
    fn from(value: crate::password::HashError) -> Self {
        Self::Hashing(value.to_string())
    }
}
