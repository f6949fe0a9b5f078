//! Router assembly

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::handlers::{health_check_handler, not_found_handler, search_handler, upload_handler};
use crate::state::AppState;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{BoxError, Router};
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Build the API router with its middleware stack.
///
/// Both the slash-terminated paths and their bare forms are served.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        .route("/upload/", post(upload_handler))
        .route("/upload", post(upload_handler))
        .route("/search/", get(search_handler))
        .route("/search", get(search_handler))
        .route(&config.health_check_path, get(health_check_handler))
        .fallback(not_found_handler);

    with_middleware(router, &config).with_state(state)
}

/// Body limit, request timeout and optional request tracing
fn with_middleware<S>(router: Router<S>, config: &HttpConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let router = router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_request_size))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(config.request_timeout())),
        );

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Render middleware failures in the same envelope as handler errors
async fn handle_middleware_error(err: BoxError) -> HttpError {
    if err.is::<Elapsed>() {
        HttpError::RequestTimeout
    } else {
        HttpError::internal(format!("Unhandled middleware error: {}", err))
    }
}
