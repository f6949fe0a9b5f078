//! # docsearch-core
//!
//! Configuration foundation shared by every docsearch crate: the
//! environment-driven [`AppConfig`], the [`Environment`] profile and the
//! [`ConfigError`] type.

pub mod config;

pub use config::validation::ConfigError;
pub use config::{load_dotenv, parse_env, AppConfig, AppConfigTrait, ConfigSource, Environment, LogFormat};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name used in logs and health responses
pub const SERVICE_NAME: &str = "docsearch";
