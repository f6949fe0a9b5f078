//! Wiring of the database, cache and engine from [`AppConfig`]

use anyhow::Context;
use docsearch_cache::{Cache, CacheConfig, MemoryBackend, RedisBackend, RedisConfig};
use docsearch_core::AppConfig;
use docsearch_engine::{SearchEngine, SearchEngineConfig};
use docsearch_store::{Database, DatabaseConfig, SqlDocumentRepository};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn connect_database(config: &AppConfig) -> anyhow::Result<Database> {
    let db_config =
        DatabaseConfig::new(&config.database_url).max_connections(config.database_max_connections);

    Database::connect(&db_config)
        .await
        .context("Could not open the document database")
}

/// Redis when `REDIS_URL` is set and reachable, process memory otherwise
pub async fn build_cache(config: &AppConfig) -> Cache {
    let cache_config = CacheConfig::default();

    if let Some(url) = &config.redis_url {
        let redis_config = RedisConfig::from_cache_config(url.as_str(), &cache_config);
        match RedisBackend::new(redis_config).await {
            Ok(backend) => {
                info!("Search results cached in Redis");
                return Cache::new(Arc::new(backend));
            }
            Err(e) => warn!(
                "Redis unavailable ({}), falling back to the in-memory cache",
                e
            ),
        }
    } else {
        info!("REDIS_URL not set, caching search results in memory");
    }

    Cache::new(Arc::new(MemoryBackend::new(cache_config)))
}

pub fn build_engine(config: &AppConfig, db: Database, cache: Cache) -> SearchEngine {
    let engine_config = SearchEngineConfig {
        cache_ttl: config.cache_ttl(),
        result_limit: config.search_result_limit,
    };
    SearchEngine::with_config(Arc::new(SqlDocumentRepository::new(db)), cache, engine_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_cache_without_redis_url() {
        let config = AppConfig::testing();
        let cache = build_cache(&config).await;
        assert_eq!(cache.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_back_to_memory() {
        let mut config = AppConfig::testing();
        config.redis_url = Some("redis://127.0.0.1:1".to_string());
        let cache = build_cache(&config).await;
        assert_eq!(cache.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_engine_over_in_memory_database() {
        let config = AppConfig::testing();
        let db = connect_database(&config).await.unwrap();
        docsearch_store::MigrationRunner::new(&db).run().await.unwrap();

        let engine = build_engine(&config, db, build_cache(&config).await);
        assert_eq!(engine.config().result_limit, config.search_result_limit);
        assert_eq!(engine.config().cache_ttl, config.cache_ttl());
        engine.ping().await.unwrap();
    }
}
