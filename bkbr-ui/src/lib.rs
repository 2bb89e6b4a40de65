//! bkbr-ui library - local browse/search service
//!
//! Serves the recipe collection as a JSON API: list with search, tag filter
//! and pagination, detail, delete, fetch-by-URL and the cached images.

use axum::routing::{get, post};
use axum::Router;
use bkbr_common::config::StoragePaths;
use bkbr_common::RecipeStore;
use bkbr_fetch::RecipeImporter;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub mod api;
pub mod error;
pub mod pagination;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Recipe document (shared with the importer)
    pub store: Arc<RecipeStore>,
    /// Fetch pipeline, one import at a time
    pub importer: Arc<RecipeImporter>,
    /// Served under /images
    pub images_dir: PathBuf,
}

impl AppState {
    pub fn new(importer: Arc<RecipeImporter>, paths: &StoragePaths) -> Self {
        Self {
            store: Arc::clone(importer.store()),
            importer,
            images_dir: paths.images_dir(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let images = ServeDir::new(&state.images_dir);

    Router::new()
        .route(
            "/api/recipes",
            get(api::list_recipes).delete(api::delete_recipe),
        )
        .route("/api/recipes/:id", get(api::get_recipe))
        .route("/api/fetch", post(api::fetch_recipe))
        .merge(api::health_routes())
        .nest_service("/images", images)
        .with_state(state)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}
