//! Document repository against an in-memory SQLite database

use docsearch_store::{
    Database, DocumentRepository, MigrationRunner, NewDocument, SqlDocumentRepository, StoreError,
};
use std::collections::BTreeMap;

async fn repository() -> SqlDocumentRepository {
    let db = Database::connect_url("sqlite::memory:").await.unwrap();
    MigrationRunner::new(&db).run().await.unwrap();
    SqlDocumentRepository::new(db)
}

fn document(name: &str, terms: &[(&str, i64)]) -> NewDocument {
    let counts: BTreeMap<String, i64> = terms.iter().map(|(w, c)| (w.to_string(), *c)).collect();
    let content = terms
        .iter()
        .flat_map(|(w, c)| std::iter::repeat(*w).take(*c as usize))
        .collect::<Vec<_>>()
        .join(" ");
    NewDocument::new(name, content, counts)
}

#[tokio::test]
async fn test_insert_and_find_by_name() {
    let repo = repository().await;

    let stored = repo
        .insert_document(document("rust.txt", &[("rust", 2), ("borrow", 1)]))
        .await
        .unwrap();
    assert!(stored.id > 0);
    assert_eq!(stored.word_count, 3);

    let found = repo.find_by_name("rust.txt").await.unwrap().unwrap();
    assert_eq!(found, stored);
    assert!(repo.find_by_name("missing.txt").await.unwrap().is_none());
}

#[tokio::test]
async fn test_count_documents() {
    let repo = repository().await;
    assert_eq!(repo.count_documents().await.unwrap(), 0);

    repo.insert_document(document("a.txt", &[("alpha", 1)])).await.unwrap();
    repo.insert_document(document("b.txt", &[("beta", 1)])).await.unwrap();

    assert_eq!(repo.count_documents().await.unwrap(), 2);
}

#[tokio::test]
async fn test_postings_join_document_lengths() {
    let repo = repository().await;

    let a = repo
        .insert_document(document("a.txt", &[("shared", 1), ("alpha", 3)]))
        .await
        .unwrap();
    let b = repo
        .insert_document(document("b.txt", &[("shared", 2)]))
        .await
        .unwrap();

    let postings = repo.postings("shared").await.unwrap();
    assert_eq!(postings.len(), 2);

    assert_eq!(postings[0].doc_id, a.id);
    assert_eq!(postings[0].doc_name, "a.txt");
    assert_eq!(postings[0].count, 1);
    assert_eq!(postings[0].word_count, 4);

    assert_eq!(postings[1].doc_id, b.id);
    assert_eq!(postings[1].count, 2);
    assert_eq!(postings[1].word_count, 2);

    assert!(repo.postings("absent").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_name_is_a_conflict_and_leaves_no_rows() {
    let repo = repository().await;
    repo.insert_document(document("dup.txt", &[("first", 1)])).await.unwrap();

    let err = repo
        .insert_document(document("dup.txt", &[("second", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    assert_eq!(repo.count_documents().await.unwrap(), 1);
    assert!(repo.postings("second").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ping() {
    let repo = repository().await;
    repo.ping().await.unwrap();
}
