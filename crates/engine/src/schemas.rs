//! Request and response shapes of the engine

use crate::error::{EngineError, EngineResult};
use docsearch_store::Document;
use serde::{Deserialize, Serialize};

/// Shortest accepted document body, in characters
pub const MIN_CONTENT_LENGTH: usize = 11;

/// A validated upload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentCreate {
    pub name: String,
    pub content: String,
}

impl DocumentCreate {
    /// Build and validate an upload payload
    pub fn new<N: Into<String>, C: Into<String>>(name: N, content: C) -> EngineResult<Self> {
        let payload = Self {
            name: name.into(),
            content: content.into(),
        };
        payload.validate()?;
        Ok(payload)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::validation("name", "must not be empty"));
        }

        let length = self.content.chars().count();
        if length < MIN_CONTENT_LENGTH {
            return Err(EngineError::validation(
                "content",
                format!(
                    "must be at least {} characters, got {}",
                    MIN_CONTENT_LENGTH, length
                ),
            ));
        }

        Ok(())
    }
}

/// Public view of a stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: i64,
    pub name: String,
    pub word_count: i64,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            name: document.name,
            word_count: document.word_count,
        }
    }
}

/// One ranked hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub score: f64,
}
