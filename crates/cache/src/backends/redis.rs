//! Redis cache backend

use crate::{CacheBackend, CacheConfig, CacheError, CacheResult, CacheStats};
use async_trait::async_trait;
use parking_lot::Mutex;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Keys deleted per DEL while a prefixed flush walks the keyspace with SCAN
const FLUSH_BATCH_SIZE: usize = 500;

/// Redis connection configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub connection_timeout: Duration,
    pub command_timeout: Duration,
    /// Prefix for every key; flush only touches prefixed keys when set
    pub key_prefix: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            connection_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(1),
            key_prefix: Some("docsearch:".to_string()),
        }
    }
}

impl RedisConfig {
    pub fn builder() -> RedisConfigBuilder {
        RedisConfigBuilder::default()
    }

    /// Build a Redis config that shares timeouts with a [`CacheConfig`]
    pub fn from_cache_config<S: Into<String>>(url: S, cache: &CacheConfig) -> Self {
        Self {
            url: url.into(),
            connection_timeout: cache.connection_timeout,
            command_timeout: cache.operation_timeout,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct RedisConfigBuilder {
    config: RedisConfig,
}

impl RedisConfigBuilder {
    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.url = url.into();
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.config.command_timeout = timeout;
        self
    }

    pub fn key_prefix<S: Into<String>>(mut self, prefix: Option<S>) -> Self {
        self.config.key_prefix = prefix.map(|p| p.into());
        self
    }

    pub fn build(self) -> RedisConfig {
        self.config
    }
}

/// Redis cache backend over a reconnecting multiplexed connection
pub struct RedisBackend {
    connection: ConnectionManager,
    config: RedisConfig,
    stats: Mutex<CacheStats>,
}

impl RedisBackend {
    /// Connect and verify the server answers PING
    pub async fn new(config: RedisConfig) -> CacheResult<Self> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| CacheError::Configuration(format!("Invalid Redis URL: {}", e)))?;

        let mut connection = tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout)?
            .map_err(|e| CacheError::Backend(format!("Failed to connect to Redis: {}", e)))?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|e| CacheError::Backend(format!("Redis ping failed: {}", e)))?;
        debug!("Redis connection established ({})", pong);

        Ok(Self {
            connection,
            config,
            stats: Mutex::new(CacheStats::default()),
        })
    }

    pub async fn from_url<S: Into<String>>(url: S) -> CacheResult<Self> {
        let config = RedisConfig {
            url: url.into(),
            ..Default::default()
        };
        Self::new(config).await
    }

    fn format_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Run a command on a cloned connection, bounded by the command timeout
    async fn run<F, Fut, R>(&self, operation: F) -> CacheResult<R>
    where
        F: FnOnce(ConnectionManager) -> Fut,
        Fut: Future<Output = redis::RedisResult<R>>,
    {
        tokio::time::timeout(self.config.command_timeout, operation(self.connection.clone()))
            .await
            .map_err(|_| CacheError::Timeout)?
            .map_err(|e| CacheError::Backend(format!("Redis operation failed: {}", e)))
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let formatted_key = self.format_key(key);

        let result = self
            .run(|mut conn| async move { conn.get::<_, Option<Vec<u8>>>(formatted_key).await })
            .await;

        let mut stats = self.stats.lock();
        match result {
            Ok(Some(data)) => {
                stats.hits += 1;
                Ok(Some(data))
            }
            Ok(None) => {
                stats.misses += 1;
                Ok(None)
            }
            Err(e) => {
                stats.misses += 1;
                error!("Redis GET error for key '{}': {}", key, e);
                Err(e)
            }
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()> {
        let formatted_key = self.format_key(key);

        let result = self
            .run(|mut conn| async move {
                match ttl {
                    // SETEX rejects a zero expiry
                    Some(ttl) => {
                        let seconds = ttl.as_secs().max(1) as usize;
                        conn.set_ex::<_, _, ()>(formatted_key, value, seconds).await
                    }
                    None => conn.set::<_, _, ()>(formatted_key, value).await,
                }
            })
            .await;

        if let Err(e) = &result {
            error!("Redis SET error for key '{}': {}", key, e);
        }
        result
    }

    async fn forget(&self, key: &str) -> CacheResult<bool> {
        let formatted_key = self.format_key(key);

        let removed = self
            .run(|mut conn| async move { conn.del::<_, i64>(formatted_key).await })
            .await?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let formatted_key = self.format_key(key);

        self.run(|mut conn| async move { conn.exists::<_, bool>(formatted_key).await })
            .await
    }

    async fn flush(&self) -> CacheResult<()> {
        let prefix = self.config.key_prefix.clone();

        let result = self
            .run(|mut conn| async move {
                match prefix {
                    Some(prefix) => {
                        let mut deleter = conn.clone();
                        let mut keys = conn.scan_match::<_, String>(format!("{}*", prefix)).await?;
                        let mut batch = Vec::with_capacity(FLUSH_BATCH_SIZE);
                        while let Some(key) = keys.next_item().await {
                            batch.push(key);
                            if batch.len() == FLUSH_BATCH_SIZE {
                                deleter.del::<_, ()>(std::mem::take(&mut batch)).await?;
                            }
                        }
                        if !batch.is_empty() {
                            deleter.del::<_, ()>(batch).await?;
                        }
                        Ok(())
                    }
                    None => {
                        warn!("Flushing entire Redis database - no key prefix configured");
                        redis::cmd("FLUSHDB").query_async::<_, ()>(&mut conn).await
                    }
                }
            })
            .await;

        match &result {
            Ok(()) => debug!("Redis cache flushed"),
            Err(e) => error!("Redis FLUSH error: {}", e),
        }
        result
    }

    fn name(&self) -> &'static str {
        "redis"
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        let local = self.stats.lock().clone();

        let info = self
            .run(|mut conn| async move {
                redis::cmd("INFO").arg("memory").query_async::<_, String>(&mut conn).await
            })
            .await;

        let memory_usage = info
            .ok()
            .and_then(|info| {
                info.lines()
                    .find_map(|line| line.strip_prefix("used_memory:"))
                    .and_then(|mem| mem.trim().parse::<u64>().ok())
            })
            .unwrap_or(local.memory_usage);

        Ok(CacheStats {
            memory_usage,
            ..local
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis instance

    fn test_config(prefix: &str) -> RedisConfig {
        RedisConfig::builder()
            .url("redis://127.0.0.1:6379")
            .key_prefix(Some(prefix))
            .build()
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_backend_basic_operations() {
        let backend = RedisBackend::new(test_config("docsearch_test:")).await.unwrap();
        backend.flush().await.unwrap();

        backend
            .put("search:rust", b"[]".to_vec(), Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert_eq!(backend.get("search:rust").await.unwrap(), Some(b"[]".to_vec()));
        assert!(backend.exists("search:rust").await.unwrap());

        assert!(backend.forget("search:rust").await.unwrap());
        assert!(!backend.exists("search:rust").await.unwrap());
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_backend_ttl() {
        let backend = RedisBackend::new(test_config("docsearch_ttl:")).await.unwrap();
        backend.flush().await.unwrap();

        backend
            .put("short", b"value".to_vec(), Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert!(backend.exists("short").await.unwrap());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(backend.get("short").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_prefixed_flush_leaves_other_keys() {
        let ours = RedisBackend::new(test_config("docsearch_a:")).await.unwrap();
        let theirs = RedisBackend::new(test_config("docsearch_b:")).await.unwrap();

        ours.put("k", b"1".to_vec(), None).await.unwrap();
        theirs.put("k", b"2".to_vec(), None).await.unwrap();

        ours.flush().await.unwrap();

        assert!(!ours.exists("k").await.unwrap());
        assert!(theirs.exists("k").await.unwrap());
        theirs.flush().await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_prefixed_flush_removes_keys_across_batches() {
        let backend = RedisBackend::new(test_config("docsearch_batch:")).await.unwrap();

        let total = FLUSH_BATCH_SIZE * 2 + 7;
        for i in 0..total {
            backend.put(&format!("k{}", i), b"v".to_vec(), None).await.unwrap();
        }

        backend.flush().await.unwrap();

        assert!(!backend.exists("k0").await.unwrap());
        assert!(!backend.exists(&format!("k{}", total - 1)).await.unwrap());
    }

    #[test]
    fn test_redis_config_builder() {
        let config = RedisConfig::builder()
            .url("redis://localhost:6380")
            .connection_timeout(Duration::from_secs(10))
            .key_prefix(Some("myapp:"))
            .build();

        assert_eq!(config.url, "redis://localhost:6380");
        assert_eq!(config.connection_timeout, Duration::from_secs(10));
        assert_eq!(config.key_prefix.as_deref(), Some("myapp:"));
    }

    #[test]
    fn test_config_from_cache_config() {
        let cache = CacheConfig::builder()
            .operation_timeout(Duration::from_millis(250))
            .build();
        let config = RedisConfig::from_cache_config("redis://cache:6379/2", &cache);

        assert_eq!(config.url, "redis://cache:6379/2");
        assert_eq!(config.command_timeout, Duration::from_millis(250));
        assert_eq!(config.key_prefix.as_deref(), Some("docsearch:"));
    }
}
