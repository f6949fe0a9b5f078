//! Serving over a real socket and shutting down on demand

use docsearch_cache::{Cache, CacheConfig, MemoryBackend};
use docsearch_engine::SearchEngine;
use docsearch_http::{build_router, serve_with_shutdown, AppState, HttpConfig};
use docsearch_store::{Database, MigrationRunner, SqlDocumentRepository};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

#[tokio::test]
async fn test_serves_health_and_stops_on_signal() {
    let db = Database::connect_url("sqlite::memory:").await.unwrap();
    MigrationRunner::new(&db).run().await.unwrap();
    let cache = Cache::new(Arc::new(MemoryBackend::new(CacheConfig::default())));
    let engine = SearchEngine::new(Arc::new(SqlDocumentRepository::new(db)), cache);
    let router = build_router(AppState::new(engine, HttpConfig::default()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve_with_shutdown(
        listener,
        router,
        async move {
            let _ = stop_rx.await;
        },
        Duration::from_secs(5),
    ));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("\"status\":\"healthy\""));

    stop_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(10), server)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}
