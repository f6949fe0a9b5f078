//! # docsearch-cache
//!
//! Cache for ranked search results. Values are stored as JSON bytes behind
//! the [`CacheBackend`] trait so the engine can run against process memory in
//! development and tests, and against Redis in production.
//!
//! ```rust
//! use docsearch_cache::{Cache, CacheConfig, MemoryBackend};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let cache = Cache::new(Arc::new(MemoryBackend::new(CacheConfig::default())));
//!
//! cache.put("search:rust", &vec!["a.txt".to_string()], Duration::from_secs(60)).await.unwrap();
//! let hit: Option<Vec<String>> = cache.get("search:rust").await.unwrap();
//! assert_eq!(hit, Some(vec!["a.txt".to_string()]));
//!
//! cache.flush().await.unwrap();
//! assert!(!cache.exists("search:rust").await.unwrap());
//! # });
//! ```

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub mod backends;
pub mod config;

pub use backends::*;
pub use config::*;

/// Cache operation errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Cache configuration error: {0}")]
    Configuration(String),

    #[error("Timeout error")]
    Timeout,
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Storage contract every cache backend implements
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get raw bytes for a key, `None` on miss or expiry
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store raw bytes, expiring after `ttl` when given
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()>;

    /// Remove a key, returning whether it was present
    async fn forget(&self, key: &str) -> CacheResult<bool>;

    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Drop every entry owned by this backend
    async fn flush(&self) -> CacheResult<()>;

    /// Short backend label for logs and health output
    fn name(&self) -> &'static str;

    async fn stats(&self) -> CacheResult<CacheStats> {
        Ok(CacheStats::default())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total_keys: u64,
    pub memory_usage: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Typed cache handle shared across request handlers
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn CacheBackend>,
}

impl Cache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Get a typed value from the cache
    pub async fn get<T>(&self, key: &str) -> CacheResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.backend.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Put a typed value in the cache
    pub async fn put<T>(&self, key: &str, value: &T, ttl: Duration) -> CacheResult<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value)?;
        self.backend.put(key, bytes, Some(ttl)).await
    }

    pub async fn forget(&self, key: &str) -> CacheResult<bool> {
        self.backend.forget(key).await
    }

    pub async fn exists(&self, key: &str) -> CacheResult<bool> {
        self.backend.exists(key).await
    }

    /// Clear all cache entries
    pub async fn flush(&self) -> CacheResult<()> {
        self.backend.flush().await
    }

    pub async fn stats(&self) -> CacheResult<CacheStats> {
        self.backend.stats().await
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Hit {
        name: String,
        score: f64,
    }

    fn memory_cache() -> Cache {
        Cache::new(Arc::new(MemoryBackend::new(CacheConfig::default())))
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let cache = memory_cache();
        let hits = vec![Hit {
            name: "notes.txt".to_string(),
            score: 0.25,
        }];

        cache.put("search:notes", &hits, Duration::from_secs(60)).await.unwrap();
        let cached: Option<Vec<Hit>> = cache.get("search:notes").await.unwrap();
        assert_eq!(cached, Some(hits));
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_an_error() {
        let backend = Arc::new(MemoryBackend::new(CacheConfig::default()));
        backend.put("search:bad", b"not json".to_vec(), None).await.unwrap();

        let cache = Cache::new(backend);
        let result: CacheResult<Option<Vec<Hit>>> = cache.get("search:bad").await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_flush_clears_everything() {
        let cache = memory_cache();
        cache.put("a", &1u8, Duration::from_secs(60)).await.unwrap();
        cache.put("b", &2u8, Duration::from_secs(60)).await.unwrap();

        cache.flush().await.unwrap();

        assert!(!cache.exists("a").await.unwrap());
        assert!(!cache.exists("b").await.unwrap());
        assert_eq!(cache.backend_name(), "memory");
    }

    #[test]
    fn test_hit_ratio() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_ratio(), 0.75);
        assert_eq!(CacheStats::default().hit_ratio(), 0.0);
    }
}
