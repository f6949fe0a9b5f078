//! Connection pool management

use crate::error::{StoreError, StoreResult};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::time::Duration;
use tracing::{debug, info};

/// SQL dialect behind the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    pub fn from_url(url: &str) -> StoreResult<Self> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(StoreError::Configuration(format!(
                "Unsupported database scheme '{}'",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
        }
    }
}

/// Pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// An in-memory SQLite database lives only as long as its one connection
    fn is_in_memory(&self) -> bool {
        self.url.starts_with("sqlite:") && self.url.contains(":memory:")
    }
}

/// Shared database handle
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    dialect: Dialect,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let dialect = Dialect::from_url(&config.url)?;
        sqlx::any::install_default_drivers();

        let mut options = AnyPoolOptions::new().acquire_timeout(config.acquire_timeout);

        options = if config.is_in_memory() {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options.max_connections(config.max_connections.max(1))
        };

        let pool = options.connect(&config.url).await.map_err(|e| {
            StoreError::Connection(format!(
                "Failed to connect to {} database at {}: {}",
                dialect.name(),
                redact_url(&config.url),
                e
            ))
        })?;

        info!(
            "Connected to {} database at {}",
            dialect.name(),
            redact_url(&config.url)
        );

        Ok(Self { pool, dialect })
    }

    pub async fn connect_url(url: &str) -> StoreResult<Self> {
        Self::connect(&DatabaseConfig::new(url)).await
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        debug!("Database ping succeeded");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Hide the password part of a connection URL for logging
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    match rest.split_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{}://{}:***@{}", scheme, user, host)
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_url() {
        assert_eq!(Dialect::from_url("postgres://localhost/db").unwrap(), Dialect::Postgres);
        assert_eq!(Dialect::from_url("postgresql://localhost/db").unwrap(), Dialect::Postgres);
        assert_eq!(Dialect::from_url("sqlite::memory:").unwrap(), Dialect::Sqlite);
        assert!(Dialect::from_url("mysql://localhost/db").is_err());
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("postgres://search:secret@db:5432/docsearch"),
            "postgres://search:***@db:5432/docsearch"
        );
        assert_eq!(redact_url("sqlite://search_engine.db"), "sqlite://search_engine.db");
        assert_eq!(redact_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[tokio::test]
    async fn test_connect_and_ping_in_memory() {
        let db = Database::connect_url("sqlite::memory:").await.unwrap();
        assert_eq!(db.dialect(), Dialect::Sqlite);
        db.ping().await.unwrap();
        db.close().await;
    }
}
