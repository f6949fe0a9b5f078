use crate::config::{validate_database_url, validate_redis_url, ConfigError, ConfigSource};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuration trait for application configuration
pub trait AppConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}

/// Environment enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue {
                field: "environment".to_string(),
                value: s.to_string(),
                expected: "development, testing, or production".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env_str = match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
        };
        write!(f, "{}", env_str)
    }
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn is_testing(&self) -> bool {
        matches!(self, Environment::Testing)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Log format used when `LOG_FORMAT` is not set
    pub fn default_log_format(&self) -> LogFormat {
        if self.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Plain,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "plain" | "text" | "compact" => Ok(LogFormat::Plain),
            _ => Err(ConfigError::invalid_value("log_format", s, "json, pretty, or plain")),
        }
    }
}

/// Defaults matching the container entrypoint
pub struct AppDefaults;

impl AppDefaults {
    pub const HOST: &'static str = "0.0.0.0";
    pub const PORT: u16 = 8000;
    pub const DATABASE_URL: &'static str = "sqlite://search_engine.db?mode=rwc";
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;
    pub const CACHE_TTL_SECS: u64 = 3600;
    pub const SEARCH_RESULT_LIMIT: usize = 10;
    pub const LOG_LEVEL: &'static str = "info";
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Unset means results are cached in process memory
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    pub search_result_limit: usize,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            environment: Environment::Development,
            host: AppDefaults::HOST.to_string(),
            port: AppDefaults::PORT,
            database_url: AppDefaults::DATABASE_URL.to_string(),
            database_max_connections: AppDefaults::DATABASE_MAX_CONNECTIONS,
            redis_url: None,
            cache_ttl_secs: AppDefaults::CACHE_TTL_SECS,
            search_result_limit: AppDefaults::SEARCH_RESULT_LIMIT,
            log_level: AppDefaults::LOG_LEVEL.to_string(),
            log_format: LogFormat::Pretty,
        }
    }

    /// Create configuration for testing: in-memory SQLite, memory cache, random port
    pub fn testing() -> Self {
        Self {
            environment: Environment::Testing,
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            redis_url: None,
            cache_ttl_secs: 60,
            search_result_limit: AppDefaults::SEARCH_RESULT_LIMIT,
            log_level: "warn".to_string(),
            log_format: LogFormat::Plain,
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if Redis is configured
    pub fn has_redis(&self) -> bool {
        self.redis_url.is_some()
    }

    /// TTL applied to cached search results
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfigTrait for AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Ok(env_str) = env::var("ENVIRONMENT") {
            config.environment = env_str.parse()?;
        }

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }

        config.port = parse_env("PORT", "port", "valid port number (0-65535)", config.port)?;

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }

        config.database_max_connections = parse_env(
            "DATABASE_MAX_CONNECTIONS",
            "database_max_connections",
            "positive number of connections",
            config.database_max_connections,
        )?;

        config.redis_url = env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty());

        config.cache_ttl_secs = parse_env(
            "REDIS_CACHE_TTL_SECONDS",
            "cache_ttl_secs",
            "valid number of seconds",
            config.cache_ttl_secs,
        )?;

        config.search_result_limit = parse_env(
            "SEARCH_RESULT_LIMIT",
            "search_result_limit",
            "positive number of results",
            config.search_result_limit,
        )?;

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.log_level = log_level.to_lowercase();
        }

        config.log_format = match env::var("LOG_FORMAT") {
            Ok(format) => format.parse()?,
            Err(_) => config.environment.default_log_format(),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Port 0 asks the OS for a free port, only meaningful in tests
        if !self.environment.is_testing() && self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                value: self.port.to_string(),
                expected: "port between 1 and 65535".to_string(),
            });
        }

        validate_database_url(&self.database_url)?;

        if let Some(redis_url) = &self.redis_url {
            validate_redis_url(redis_url)?;
        }

        if self.database_max_connections == 0 {
            return Err(ConfigError::validation_failed(
                "Database pool must allow at least one connection",
            ));
        }

        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::validation_failed(
                "Cache TTL must be greater than 0",
            ));
        }

        if self.search_result_limit == 0 {
            return Err(ConfigError::validation_failed(
                "Search result limit must be greater than 0",
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log_level".to_string(),
                value: self.log_level.clone(),
                expected: format!("one of: {}", valid_levels.join(", ")),
            });
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let fields = [
            ("environment", "ENVIRONMENT", "development".to_string()),
            ("host", "HOST", AppDefaults::HOST.to_string()),
            ("port", "PORT", AppDefaults::PORT.to_string()),
            ("database_url", "DATABASE_URL", AppDefaults::DATABASE_URL.to_string()),
            (
                "database_max_connections",
                "DATABASE_MAX_CONNECTIONS",
                AppDefaults::DATABASE_MAX_CONNECTIONS.to_string(),
            ),
            ("redis_url", "REDIS_URL", "in-memory cache".to_string()),
            (
                "cache_ttl_secs",
                "REDIS_CACHE_TTL_SECONDS",
                AppDefaults::CACHE_TTL_SECS.to_string(),
            ),
            (
                "search_result_limit",
                "SEARCH_RESULT_LIMIT",
                AppDefaults::SEARCH_RESULT_LIMIT.to_string(),
            ),
            ("log_level", "LOG_LEVEL", AppDefaults::LOG_LEVEL.to_string()),
            ("log_format", "LOG_FORMAT", "based on environment".to_string()),
        ];

        fields
            .into_iter()
            .map(|(field, var, default)| {
                let source = if env::var(var).is_ok() {
                    ConfigSource::EnvVar(var.to_string())
                } else {
                    ConfigSource::Default(default)
                };
                (field.to_string(), source)
            })
            .collect()
    }
}

/// Load a `.env` file for local runs. Skipped inside the container image,
/// where `RUNNING_IN_DOCKER` is set and the environment is authoritative.
///
/// Runs before logging is configured, so the caller reports the returned path.
pub fn load_dotenv() -> Option<PathBuf> {
    if env::var("RUNNING_IN_DOCKER").is_ok() {
        return None;
    }

    dotenv::dotenv().ok()
}

/// Read `var` and parse it, falling back to `default` when unset
pub fn parse_env<T: FromStr>(
    var: &str,
    field: &str,
    expected: &str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::invalid_value(field, raw, expected)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "ENVIRONMENT",
        "HOST",
        "PORT",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
        "REDIS_URL",
        "REDIS_CACHE_TTL_SECONDS",
        "SEARCH_RESULT_LIMIT",
        "LOG_LEVEL",
        "LOG_FORMAT",
    ];

    fn clean_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_match_container_entrypoint() {
        clean_env();
        let config = AppConfig::from_env().unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.search_result_limit, 10);
        assert!(!config.has_redis());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clean_env();
        env::set_var("ENVIRONMENT", "production");
        env::set_var("PORT", "9000");
        env::set_var("DATABASE_URL", "postgres://db/docsearch");
        env::set_var("REDIS_URL", "redis://cache:6379/0");
        env::set_var("REDIS_CACHE_TTL_SECONDS", "120");

        let config = AppConfig::from_env().unwrap();
        clean_env();

        assert!(config.environment.is_production());
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url, "postgres://db/docsearch");
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379/0"));
        assert_eq!(config.cache_ttl_secs, 120);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    #[serial]
    fn test_invalid_ttl_is_rejected() {
        clean_env();
        env::set_var("REDIS_CACHE_TTL_SECONDS", "an hour");

        let result = AppConfig::from_env();
        clean_env();

        match result {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "cache_ttl_secs"),
            other => panic!("expected invalid value error, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_blank_redis_url_means_memory_cache() {
        clean_env();
        env::set_var("REDIS_URL", "  ");

        let config = AppConfig::from_env().unwrap();
        clean_env();

        assert!(!config.has_redis());
    }

    #[test]
    #[serial]
    fn test_config_sources_report_env_vars() {
        clean_env();
        env::set_var("PORT", "8100");

        let config = AppConfig::from_env().unwrap();
        let sources = config.config_sources();
        clean_env();

        assert!(sources["port"].is_env_var());
        assert!(sources["host"].is_default());
    }

    #[test]
    fn test_port_validation() {
        let mut config = AppConfig::testing();
        config.port = 0;
        assert!(config.validate().is_ok(), "port 0 is allowed when testing");

        let mut config = AppConfig::new();
        config.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_result_limit_rejected() {
        let mut config = AppConfig::testing();
        config.search_result_limit = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Plain);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    #[serial]
    fn test_dotenv_is_skipped_in_container() {
        env::set_var("RUNNING_IN_DOCKER", "1");
        assert_eq!(load_dotenv(), None);
        env::remove_var("RUNNING_IN_DOCKER");
    }
}
