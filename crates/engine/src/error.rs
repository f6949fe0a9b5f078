//! Engine errors

use docsearch_cache::CacheError;
use docsearch_store::StoreError;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The upload payload was rejected
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// A document with this name is already indexed
    #[error("Document '{0}' already exists")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl EngineError {
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = EngineError::validation("content", "too short");
        assert_eq!(err.to_string(), "Validation failed for 'content': too short");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = EngineError::from(StoreError::Connection("refused".to_string()));
        assert_eq!(err.to_string(), "Connection error: refused");
    }
}
