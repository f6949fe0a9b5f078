//! Health check endpoint

use crate::errors::{HttpError, HttpResult};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub database: &'static str,
    pub cache: &'static str,
}

/// Liveness plus a database round trip; `503` when the database is down
pub async fn health_check_handler(State(state): State<AppState>) -> HttpResult<Json<HealthStatus>> {
    if let Err(e) = state.engine.ping().await {
        warn!("Health check failed: {}", e);
        return Err(HttpError::health_check(format!("database unreachable: {}", e)));
    }

    Ok(Json(HealthStatus {
        status: "healthy",
        service: docsearch_core::SERVICE_NAME,
        version: docsearch_core::VERSION,
        timestamp: chrono::Utc::now().to_rfc3339(),
        database: "up",
        cache: state.engine.cache().backend_name(),
    }))
}
