//! HTTP server configuration
//!
//! Tuning knobs read from `HTTP_*` environment variables, layered on top of
//! the service-wide [`docsearch_core::AppConfig`].

use super::defaults::HttpDefaults;
use docsearch_core::{parse_env, AppConfigTrait, ConfigError, ConfigSource};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

const ENV_VARS: [(&str, &str); 5] = [
    ("request_timeout_secs", "HTTP_REQUEST_TIMEOUT"),
    ("max_request_size", "HTTP_MAX_REQUEST_SIZE"),
    ("enable_tracing", "HTTP_ENABLE_TRACING"),
    ("health_check_path", "HTTP_HEALTH_CHECK_PATH"),
    ("shutdown_timeout_secs", "HTTP_SHUTDOWN_TIMEOUT"),
];

/// HTTP server specific configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes
    pub max_request_size: usize,
    /// Enable request tracing
    pub enable_tracing: bool,
    /// Health check endpoint path
    pub health_check_path: String,
    /// How long in-flight requests may drain after a shutdown signal
    pub shutdown_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: HttpDefaults::REQUEST_TIMEOUT_SECS,
            max_request_size: HttpDefaults::MAX_REQUEST_SIZE,
            enable_tracing: HttpDefaults::ENABLE_TRACING,
            health_check_path: HttpDefaults::HEALTH_CHECK_PATH.to_string(),
            shutdown_timeout_secs: HttpDefaults::SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl AppConfigTrait for HttpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let config = HttpConfig {
            request_timeout_secs: parse_env(
                "HTTP_REQUEST_TIMEOUT",
                "request_timeout_secs",
                "valid number of seconds",
                HttpDefaults::REQUEST_TIMEOUT_SECS,
            )?,
            max_request_size: parse_env(
                "HTTP_MAX_REQUEST_SIZE",
                "max_request_size",
                "valid number of bytes",
                HttpDefaults::MAX_REQUEST_SIZE,
            )?,
            enable_tracing: parse_env(
                "HTTP_ENABLE_TRACING",
                "enable_tracing",
                "true or false",
                HttpDefaults::ENABLE_TRACING,
            )?,
            health_check_path: env::var("HTTP_HEALTH_CHECK_PATH")
                .unwrap_or_else(|_| HttpDefaults::HEALTH_CHECK_PATH.to_string()),
            shutdown_timeout_secs: parse_env(
                "HTTP_SHUTDOWN_TIMEOUT",
                "shutdown_timeout_secs",
                "valid number of seconds",
                HttpDefaults::SHUTDOWN_TIMEOUT_SECS,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation_failed(
                "Request timeout must be greater than 0",
            ));
        }

        if self.shutdown_timeout_secs == 0 {
            return Err(ConfigError::validation_failed(
                "Shutdown timeout must be greater than 0",
            ));
        }

        if self.max_request_size == 0 {
            return Err(ConfigError::validation_failed(
                "Maximum request size must be greater than 0",
            ));
        }

        if !self.health_check_path.starts_with('/') {
            return Err(ConfigError::validation_failed(
                "Health check path must be non-empty and start with '/'",
            ));
        }

        let reserved = ["/upload", "/upload/", "/search", "/search/"];
        if reserved.contains(&self.health_check_path.as_str()) {
            return Err(ConfigError::validation_failed(format!(
                "Health check path '{}' collides with an API route",
                self.health_check_path
            )));
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        ENV_VARS
            .iter()
            .map(|(field, var)| {
                let source = if env::var(var).is_ok() {
                    ConfigSource::EnvVar(var.to_string())
                } else {
                    ConfigSource::Default("built-in".to_string())
                };
                (field.to_string(), source)
            })
            .collect()
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clean_env() {
        for (_, var) in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_from_empty_env() {
        clean_env();
        let config = HttpConfig::from_env().unwrap();
        assert_eq!(config, HttpConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config
            .config_sources()
            .values()
            .all(|source| matches!(source, ConfigSource::Default(_))));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clean_env();
        env::set_var("HTTP_REQUEST_TIMEOUT", "60");
        env::set_var("HTTP_MAX_REQUEST_SIZE", "1024");
        env::set_var("HTTP_ENABLE_TRACING", "false");
        env::set_var("HTTP_HEALTH_CHECK_PATH", "/healthz");
        env::set_var("HTTP_SHUTDOWN_TIMEOUT", "5");

        let config = HttpConfig::from_env().unwrap();
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.max_request_size, 1024);
        assert!(!config.enable_tracing);
        assert_eq!(config.health_check_path, "/healthz");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.config_sources().get("max_request_size"),
            Some(&ConfigSource::EnvVar("HTTP_MAX_REQUEST_SIZE".to_string()))
        );

        clean_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        clean_env();
        env::set_var("HTTP_REQUEST_TIMEOUT", "soon");
        assert!(matches!(
            HttpConfig::from_env(),
            Err(ConfigError::InvalidValue { .. })
        ));
        clean_env();
    }

    #[test]
    fn test_validation() {
        let mut config = HttpConfig::default();
        assert!(config.validate().is_ok());

        config.health_check_path = "health".to_string();
        assert!(config.validate().is_err());

        config.health_check_path = "/search".to_string();
        assert!(config.validate().is_err());

        let config = HttpConfig {
            max_request_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
