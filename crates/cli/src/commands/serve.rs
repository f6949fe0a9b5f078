use crate::bootstrap::{build_cache, build_engine, connect_database};
use anyhow::Context;
use docsearch_core::{AppConfig, AppConfigTrait, ConfigSource, SERVICE_NAME, VERSION};
use docsearch_http::{
    build_router, log_shutdown_info, log_startup_info, start_server, AppState, HttpConfig,
};
use docsearch_store::MigrationRunner;
use std::collections::HashMap;
use std::net::SocketAddr;
use tracing::{debug, info};

pub struct ServeOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_migrate: bool,
}

/// Apply `--host`/`--port` on top of the environment, recording where each value came from
fn apply_overrides(
    config: &mut AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> HashMap<String, ConfigSource> {
    let mut sources = config.config_sources();
    if let Some(host) = host {
        config.host = host;
        sources.insert("host".to_string(), ConfigSource::Programmatic);
    }
    if let Some(port) = port {
        config.port = port;
        sources.insert("port".to_string(), ConfigSource::Programmatic);
    }
    sources
}

pub async fn run(mut config: AppConfig, options: ServeOptions) -> anyhow::Result<()> {
    let sources = apply_overrides(&mut config, options.host, options.port);
    config.validate()?;
    for (field, source) in &sources {
        debug!(field = %field, source = %source, "Configuration source");
    }

    let http_config = HttpConfig::from_env()?;
    let addr: SocketAddr = tokio::net::lookup_host(config.bind_address())
        .await
        .with_context(|| format!("Invalid bind address '{}'", config.bind_address()))?
        .next()
        .with_context(|| format!("'{}' did not resolve to any address", config.bind_address()))?;

    let db = connect_database(&config).await?;

    if options.no_migrate {
        info!("Skipping migrations (--no-migrate)");
    } else {
        let result = MigrationRunner::new(&db)
            .run()
            .await
            .context("Failed to apply database migrations")?;
        info!(
            applied = result.applied_count(),
            skipped = result.skipped_count,
            "Database schema is up to date"
        );
    }

    let cache = build_cache(&config).await;
    let engine = build_engine(&config, db.clone(), cache);
    let router = build_router(AppState::new(engine, http_config.clone()));

    log_startup_info(SERVICE_NAME, VERSION, &config.bind_address());
    start_server(addr, router, http_config.shutdown_timeout()).await?;

    db.close().await;
    log_shutdown_info(SERVICE_NAME);
    Ok(())
}
