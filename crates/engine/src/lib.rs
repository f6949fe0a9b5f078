//! # docsearch-engine
//!
//! The indexing and ranking core of docsearch.
//!
//! - [`tokenizer`]: splits text into lowercase word tokens
//! - [`scoring`]: TF-IDF ranking over inverted index postings
//! - [`SearchEngine`]: ties the repository and the result cache together

pub mod error;
pub mod schemas;
pub mod scoring;
pub mod search_engine;
pub mod tokenizer;

pub use error::{EngineError, EngineResult};
pub use schemas::{DocumentCreate, DocumentResponse, SearchResult, MIN_CONTENT_LENGTH};
pub use search_engine::{SearchEngine, SearchEngineConfig};
pub use tokenizer::split_to_words;
