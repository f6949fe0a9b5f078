//! Request handlers

pub mod health;
pub mod search;
pub mod upload;

pub use health::{health_check_handler, HealthStatus};
pub use search::{search_handler, SearchParams};
pub use upload::{upload_handler, UploadResponse, UPLOAD_FIELD};

use crate::errors::HttpError;
use axum::http::Uri;

/// Fallback for unknown routes
pub async fn not_found_handler(uri: Uri) -> HttpError {
    HttpError::not_found(uri.path().to_string())
}
