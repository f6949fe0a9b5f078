//! # docsearch-store
//!
//! Persistence for uploaded documents and their inverted index.
//!
//! - [`Database`]: a sqlx `AnyPool` that speaks PostgreSQL in production and
//!   SQLite for local runs and tests
//! - [`DocumentRepository`]: the storage contract the search engine depends on
//! - [`migrations`]: the embedded, ordered schema history and its runner

pub mod connection;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repository;

pub use connection::{Database, DatabaseConfig, Dialect};
pub use error::{StoreError, StoreResult};
pub use migrations::{MigrationRunner, MigrationStatus};
pub use models::{Document, NewDocument, Posting};
pub use repository::{DocumentRepository, SqlDocumentRepository};
