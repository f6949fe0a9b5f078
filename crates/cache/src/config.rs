//! Cache configuration and builder

use std::time::Duration;

/// Limits and timeouts shared by the cache backends
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of entries (memory backend)
    pub max_entries: Option<usize>,
    /// Memory limit in bytes (memory backend)
    pub max_memory: Option<usize>,
    /// Expired entries are swept every this many operations (memory backend)
    pub sweep_interval: u64,
    pub connection_timeout: Duration,
    pub operation_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: Some(10_000),
            max_memory: Some(100 * 1024 * 1024),
            sweep_interval: 128,
            connection_timeout: Duration::from_secs(5),
            operation_timeout: Duration::from_secs(1),
        }
    }
}

impl CacheConfig {
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    pub fn max_entries(mut self, max: usize) -> Self {
        self.config.max_entries = Some(max);
        self
    }

    pub fn unlimited_entries(mut self) -> Self {
        self.config.max_entries = None;
        self
    }

    pub fn max_memory(mut self, bytes: usize) -> Self {
        self.config.max_memory = Some(bytes);
        self
    }

    pub fn unlimited_memory(mut self) -> Self {
        self.config.max_memory = None;
        self
    }

    pub fn sweep_interval(mut self, operations: u64) -> Self {
        self.config.sweep_interval = operations.max(1);
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.config.operation_timeout = timeout;
        self
    }

    pub fn build(self) -> CacheConfig {
        self.config
    }
}
