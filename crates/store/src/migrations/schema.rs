//! Schema history of the search database

use super::definitions::{DialectSql, Migration};

/// Every migration, oldest first
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "20250101000000",
        name: "create_documents_and_inverted_index",
        up: DialectSql {
            postgres: "
                CREATE TABLE documents (
                    id BIGSERIAL PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    content TEXT NOT NULL
                );
                CREATE TABLE inverted_index (
                    word TEXT NOT NULL,
                    doc_id BIGINT NOT NULL REFERENCES documents (id) ON DELETE CASCADE,
                    count BIGINT NOT NULL,
                    PRIMARY KEY (word, doc_id)
                );
                CREATE INDEX ix_inverted_index_doc_id ON inverted_index (doc_id);
            ",
            sqlite: "
                CREATE TABLE documents (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE,
                    content TEXT NOT NULL
                );
                CREATE TABLE inverted_index (
                    word TEXT NOT NULL,
                    doc_id INTEGER NOT NULL REFERENCES documents (id) ON DELETE CASCADE,
                    count INTEGER NOT NULL,
                    PRIMARY KEY (word, doc_id)
                );
                CREATE INDEX ix_inverted_index_doc_id ON inverted_index (doc_id);
            ",
        },
        down: DialectSql::portable(
            "
                DROP INDEX ix_inverted_index_doc_id;
                DROP TABLE inverted_index;
                DROP TABLE documents;
            ",
        ),
    },
    Migration {
        id: "20250115000000",
        name: "add_document_word_count",
        up: DialectSql {
            postgres: "ALTER TABLE documents ADD COLUMN word_count BIGINT NOT NULL DEFAULT 0;",
            sqlite: "ALTER TABLE documents ADD COLUMN word_count INTEGER NOT NULL DEFAULT 0;",
        },
        down: DialectSql::portable("ALTER TABLE documents DROP COLUMN word_count;"),
    },
];
