//! # Structured logging
//!
//! One-shot `tracing-subscriber` setup. Production emits JSON lines,
//! development pretty multi-line records, tests only errors. `RUST_LOG`
//! takes precedence over the configured filter.

use docsearch_core::{AppConfig, Environment, LogFormat};
use serde_json::json;
use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    pub format: LogFormat,
    /// Include file and line number information
    pub include_location: bool,
    /// Environment filter (supports directives like "docsearch=debug,tower_http=info")
    pub env_filter: Option<String>,
    pub service_name: Option<String>,
    pub service_version: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            env_filter: None,
            service_name: None,
            service_version: None,
        }
    }
}

impl LoggingConfig {
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            include_location: false,
            env_filter: Some("info,tower_http=info,sqlx=warn".to_string()),
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            env_filter: Some("debug,tower_http=debug,sqlx=info".to_string()),
            ..Default::default()
        }
    }

    /// Minimal output
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            format: LogFormat::Plain,
            include_location: false,
            env_filter: None,
            ..Default::default()
        }
    }

    /// Preset for the configured environment, with the level and format the
    /// operator asked for
    pub fn from_app_config(config: &AppConfig) -> Self {
        let preset = match config.environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
            Environment::Testing => Self::test(),
        };

        let env_filter = preset
            .env_filter
            .as_deref()
            .map(|directives| with_default_level(directives, &config.log_level));

        Self {
            level: config.log_level.clone(),
            format: config.log_format,
            env_filter,
            ..preset
        }
    }

    pub fn with_service(mut self, name: &str, version: &str) -> Self {
        self.service_name = Some(name.to_string());
        self.service_version = Some(version.to_string());
        self
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directives in effect when `RUST_LOG` is unset
    pub fn filter_directives(&self) -> &str {
        self.env_filter.as_deref().unwrap_or(&self.level)
    }
}

/// Replace the bare level in `directives`, keeping the per-target ones
fn with_default_level(directives: &str, level: &str) -> String {
    std::iter::once(level)
        .chain(
            directives
                .split(',')
                .map(str::trim)
                .filter(|directive| directive.contains('=')),
        )
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config.filter_directives()))?;

    let layer = Layer::new()
        .with_writer(io::stdout)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(layer.pretty())
            .try_init()?,
        LogFormat::Plain => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()?,
    }

    tracing::info!(
        target: "docsearch::logging",
        service = config.service_name.as_deref().unwrap_or("unknown"),
        version = config.service_version.as_deref().unwrap_or("unknown"),
        "Structured logging initialized (level: {}, format: {:?})",
        config.level,
        config.format
    );

    Ok(())
}

/// Log application startup with system information
pub fn log_startup_info(service_name: &str, service_version: &str, bind_address: &str) {
    let startup_info = json!({
        "event": "application_startup",
        "service": service_name,
        "version": service_version,
        "address": bind_address,
        "pid": std::process::id(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "os": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
    });

    tracing::info!(target: "docsearch::startup", "{}", startup_info);
}

pub fn log_shutdown_info(service_name: &str) {
    let shutdown_info = json!({
        "event": "application_shutdown",
        "service": service_name,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    tracing::info!(target: "docsearch::shutdown", "{}", shutdown_info);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_presets() {
        let prod = LoggingConfig::production();
        assert_eq!(prod.format, LogFormat::Json);
        assert_eq!(prod.level, "info");

        let dev = LoggingConfig::development();
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.include_location);

        let test = LoggingConfig::test();
        assert_eq!(test.level, "error");
        assert_eq!(test.filter_directives(), "error");
    }

    #[test]
    fn test_from_app_config_uses_operator_choices() {
        let mut app = AppConfig::testing();
        app.environment = Environment::Production;
        app.log_level = "warn".to_string();
        app.log_format = LogFormat::Plain;

        let config = LoggingConfig::from_app_config(&app);
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Plain);
        assert_eq!(config.filter_directives(), "warn,tower_http=info,sqlx=warn");
    }

    #[test]
    fn test_from_app_config_keeps_per_target_directives() {
        let mut app = AppConfig::testing();
        app.environment = Environment::Development;
        app.log_level = "trace".to_string();
        let config = LoggingConfig::from_app_config(&app);
        assert_eq!(config.filter_directives(), "trace,tower_http=debug,sqlx=info");

        app.environment = Environment::Testing;
        let config = LoggingConfig::from_app_config(&app);
        assert_eq!(config.filter_directives(), "trace");
    }

    #[test]
    fn test_with_default_level() {
        assert_eq!(with_default_level("info, sqlx=warn", "debug"), "debug,sqlx=warn");
        assert_eq!(with_default_level("info", "warn"), "warn");
    }

    #[test]
    fn test_builder_methods() {
        let config = LoggingConfig::default()
            .with_service("docsearch", "0.1.0")
            .with_env_filter("docsearch=trace");

        assert_eq!(config.service_name.as_deref(), Some("docsearch"));
        assert_eq!(config.service_version.as_deref(), Some("0.1.0"));
        assert_eq!(config.filter_directives(), "docsearch=trace");
    }
}
