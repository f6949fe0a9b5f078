//! Document repository

use crate::connection::Database;
use crate::error::{is_unique_violation, StoreError, StoreResult};
use crate::models::{Document, NewDocument, Posting};
use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;

/// Storage contract used by the search engine
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a document and all of its index rows atomically.
    /// A name that is already taken yields [`StoreError::Conflict`].
    async fn insert_document(&self, document: NewDocument) -> StoreResult<Document>;

    async fn count_documents(&self) -> StoreResult<i64>;

    /// Every document containing `word`, with the term count and document length
    async fn postings(&self, word: &str) -> StoreResult<Vec<Posting>>;

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Document>>;

    /// Check the backing store is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// [`DocumentRepository`] over a SQL database
#[derive(Debug, Clone)]
pub struct SqlDocumentRepository {
    db: Database,
}

impl SqlDocumentRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn document_from_row(row: &AnyRow) -> StoreResult<Document> {
    Ok(Document {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        content: row.try_get("content")?,
        word_count: row.try_get("word_count")?,
    })
}

#[async_trait]
impl DocumentRepository for SqlDocumentRepository {
    async fn insert_document(&self, document: NewDocument) -> StoreResult<Document> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(
            "INSERT INTO documents (name, content, word_count) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(document.name.clone())
        .bind(document.content.clone())
        .bind(document.word_count)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!("document named '{}'", document.name))
            } else {
                StoreError::from(e)
            }
        })?;
        let id: i64 = row.try_get("id")?;

        for (word, count) in &document.term_counts {
            sqlx::query("INSERT INTO inverted_index (word, doc_id, count) VALUES ($1, $2, $3)")
                .bind(word.clone())
                .bind(id)
                .bind(*count)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(
            doc_id = id,
            terms = document.term_counts.len(),
            "Stored document and index rows"
        );

        Ok(Document {
            id,
            name: document.name,
            content: document.content,
            word_count: document.word_count,
        })
    }

    async fn count_documents(&self) -> StoreResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM documents")
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.try_get("total")?)
    }

    async fn postings(&self, word: &str) -> StoreResult<Vec<Posting>> {
        let rows = sqlx::query(
            "SELECT i.doc_id AS doc_id, d.name AS doc_name, i.count AS term_count, \
             d.word_count AS word_count \
             FROM inverted_index i JOIN documents d ON d.id = i.doc_id \
             WHERE i.word = $1 ORDER BY i.doc_id",
        )
        .bind(word.to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| -> StoreResult<Posting> {
                Ok(Posting {
                    doc_id: row.try_get("doc_id")?,
                    doc_name: row.try_get("doc_name")?,
                    count: row.try_get("term_count")?,
                    word_count: row.try_get("word_count")?,
                })
            })
            .collect()
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, name, content, word_count FROM documents WHERE name = $1",
        )
        .bind(name.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.ping().await
    }
}
