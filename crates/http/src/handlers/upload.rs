//! `POST /upload/`

use crate::errors::{HttpError, HttpResult};
use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Multipart field carrying the document
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

/// Index an uploaded text file under its filename.
///
/// A file whose content holds no words is accepted and reported as uploaded
/// even though nothing is indexed.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> HttpResult<Json<UploadResponse>> {
    let (filename, bytes) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, state.config.max_request_size))?
            .ok_or_else(|| {
                HttpError::validation_error(format!("Missing multipart field '{}'", UPLOAD_FIELD))
            })?;

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| HttpError::validation_error("Uploaded file has no filename"))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, state.config.max_request_size))?;

        break (filename, bytes);
    };

    let content = String::from_utf8(bytes.to_vec())
        .map_err(|_| HttpError::validation_error("File content must be valid UTF-8 text"))?;

    state.engine.add_document(&filename, &content).await?;
    info!(filename = %filename, bytes = content.len(), "Upload accepted");

    Ok(Json(UploadResponse {
        message: format!("File '{}' uploaded successfully.", filename),
    }))
}

fn multipart_error(err: axum::extract::multipart::MultipartError, limit: usize) -> HttpError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HttpError::RequestTooLarge { limit }
    } else {
        HttpError::bad_request(format!("Malformed multipart body: {}", err.body_text()))
    }
}
