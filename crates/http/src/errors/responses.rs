//! HTTP error response formatting

use super::HttpError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::StartupFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            HttpError::RequestTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            HttpError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            HttpError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::HealthCheckFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            HttpError::DatabaseError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::NotFound { .. } => StatusCode::NOT_FOUND,
            HttpError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    /// Get error hint for user guidance
    pub fn error_hint(&self) -> Option<&'static str> {
        match self {
            HttpError::RequestTooLarge { .. } => Some("Reduce request payload size"),
            HttpError::RequestTimeout => Some("Retry the request"),
            HttpError::BadRequest { .. } => Some("Check request format and parameters"),
            HttpError::ValidationError { .. } => {
                Some("Upload a UTF-8 text file in the 'file' field with at least 11 characters")
            }
            HttpError::Conflict { .. } => Some("Rename the file before uploading it again"),
            HttpError::HealthCheckFailed { .. } => {
                Some("Server may be starting up or experiencing issues")
            }
            _ => None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), "{}", self);
        }

        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "hint": self.error_hint()
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(HttpError::bad_request("test").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(HttpError::RequestTimeout.status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            HttpError::RequestTooLarge { limit: 50 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            HttpError::health_check("Database unavailable").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            HttpError::validation_error("Field is required").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(HttpError::conflict("dup").status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_hints() {
        assert_eq!(HttpError::RequestTimeout.error_hint(), Some("Retry the request"));
        assert_eq!(HttpError::not_found("Document").error_hint(), None);
    }

    #[test]
    fn test_into_response_status() {
        let response = HttpError::not_found("/nowhere").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
