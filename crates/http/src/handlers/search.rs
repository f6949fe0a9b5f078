//! `GET /search/`

use crate::errors::{HttpError, HttpResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use docsearch_engine::SearchResult;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> HttpResult<Json<Vec<SearchResult>>> {
    let query = params
        .query
        .ok_or_else(|| HttpError::validation_error("Missing required query parameter 'query'"))?;

    let results = state.engine.search(&query).await?;
    Ok(Json(results))
}
