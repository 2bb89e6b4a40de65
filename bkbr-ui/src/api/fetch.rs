//! Fetch-by-URL: runs the import pipeline for a pasted or shared link

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use bkbr_common::Recipe;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    pub url: String,
}

/// POST /api/fetch
///
/// 201 with the saved recipe. A second request while one is running gets
/// 409 rather than waiting.
pub async fn fetch_recipe(
    State(state): State<AppState>,
    body: Result<Json<FetchRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Recipe>)> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    match state.importer.import(&request.url).await {
        Ok(recipe) => {
            info!(id = recipe.id.unwrap_or_default(), title = %recipe.title, "Fetched recipe");
            Ok((StatusCode::CREATED, Json(recipe)))
        }
        Err(e) => {
            warn!(url = %request.url, error = %e, "Fetch failed");
            Err(e.into())
        }
    }
}
