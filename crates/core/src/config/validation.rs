use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

/// Database URL schemes the store knows how to drive
pub const SUPPORTED_DATABASE_SCHEMES: &[&str] = &["postgres", "postgresql", "sqlite"];

/// Check that a database URL uses a supported scheme
pub fn validate_database_url(url: &str) -> Result<(), ConfigError> {
    let scheme = url.split(':').next().unwrap_or_default();
    if SUPPORTED_DATABASE_SCHEMES.contains(&scheme) {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(
            "database_url",
            url,
            format!("URL with one of the schemes: {}", SUPPORTED_DATABASE_SCHEMES.join(", ")),
        ))
    }
}

/// Check that a Redis URL uses a redis scheme
pub fn validate_redis_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("redis://") || url.starts_with("rediss://") || url.starts_with("redis+unix://") {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(
            "redis_url",
            url,
            "redis://, rediss:// or redis+unix:// URL",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_schemes() {
        assert!(validate_database_url("postgres://localhost/docsearch").is_ok());
        assert!(validate_database_url("postgresql://user@db:5432/docsearch").is_ok());
        assert!(validate_database_url("sqlite::memory:").is_ok());
        assert!(validate_database_url("sqlite://search_engine.db?mode=rwc").is_ok());

        let err = validate_database_url("mysql://localhost/docsearch").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_redis_url_schemes() {
        assert!(validate_redis_url("redis://127.0.0.1:6379/0").is_ok());
        assert!(validate_redis_url("rediss://cache.internal:6380").is_ok());
        assert!(validate_redis_url("http://127.0.0.1:6379").is_err());
    }
}
