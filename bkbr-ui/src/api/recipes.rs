//! Recipe browsing: list/search, detail, delete

use axum::{
    extract::{Path, Query, State},
    Json,
};
use bkbr_common::human_time::{format_minutes_long, format_minutes_short};
use bkbr_common::{Recipe, RecipeStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::{ApiError, ApiResult, AppState};

/// Query parameters for the recipe list
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Free-text search (title, host, tags, ingredients, cuisine, category)
    pub search: Option<String>,

    /// Exact tag, case-insensitive
    pub tag: Option<String>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

/// One row of the recipe list
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: Option<u64>,
    pub title: String,
    pub host: String,
    pub local_image: Option<String>,
    pub tags: Vec<String>,
    pub total_time: u32,
    pub total_time_display: String,
    pub ratings: Option<f64>,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            host: recipe.host.clone(),
            local_image: recipe.local_image.clone(),
            tags: recipe.tag_list().to_vec(),
            total_time: recipe.total_time,
            total_time_display: format_minutes_short(recipe.total_time),
            ratings: recipe.ratings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub total_results: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub recipes: Vec<RecipeSummary>,
}

/// Full recipe plus human-readable times
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub total_time_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time_display: Option<String>,
}

impl From<Recipe> for RecipeDetail {
    fn from(recipe: Recipe) -> Self {
        Self {
            total_time_display: format_minutes_long(recipe.total_time),
            prep_time_display: recipe.prep_time.map(format_minutes_short),
            cook_time_display: recipe.cook_time.map(format_minutes_short),
            recipe,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub title: String,
}

/// Run a store call off the async runtime
async fn with_store<T, F>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&RecipeStore) -> T + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| ApiError::Internal(format!("Store task failed: {}", e)))
}

/// GET /api/recipes?search=&tag=&page=
///
/// Filters keep store order.
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse>> {
    let recipes = with_store(&state, |store| store.load()).await?;

    let search = query.search.as_deref().map(str::trim).unwrap_or("");
    let tag = query.tag.as_deref().map(str::trim).unwrap_or("");

    let matching: Vec<&Recipe> = recipes
        .iter()
        .filter(|r| r.matches(search))
        .filter(|r| tag.is_empty() || r.has_tag(tag))
        .collect();

    let pagination = calculate_pagination(matching.len(), query.page);
    let page: Vec<RecipeSummary> = pagination
        .slice(&matching)
        .iter()
        .map(|r| RecipeSummary::from(*r))
        .collect();

    Ok(Json(ListResponse {
        search: query.search,
        tag: query.tag,
        total_results: matching.len(),
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        recipes: page,
    }))
}

/// GET /api/recipes/:id
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<RecipeDetail>> {
    let recipe = with_store(&state, move |store| store.get(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Recipe {}", id)))?;

    Ok(Json(RecipeDetail::from(recipe)))
}

/// DELETE /api/recipes?title=
///
/// Removes the first recipe with exactly this title and its cached image.
pub async fn delete_recipe(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<Recipe>> {
    let title = query.title.clone();
    let removed = with_store(&state, move |store| store.delete(&title))
        .await??
        .ok_or_else(|| ApiError::NotFound(format!("Recipe titled '{}'", query.title)))?;

    if let Some(filename) = removed.local_image.as_deref() {
        if let Err(e) = state.importer.image_fetcher().remove(filename) {
            warn!(filename = %filename, error = %e, "Could not remove cached image");
        }
    }

    info!(id = removed.id.unwrap_or_default(), title = %removed.title, "Deleted recipe");
    Ok(Json(removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn soup() -> Recipe {
        serde_json::from_value(json!({
            "host": "example.com",
            "title": "Soup",
            "total_time": 75,
            "image": "",
            "ingredients": [],
            "ingredient_groups": [],
            "instructions": "",
            "instructions_list": [],
            "yields": "2 servings"
        }))
        .unwrap()
    }

    #[test]
    fn test_detail_times_long_total_compact_prep_and_cook() {
        let mut recipe = soup();
        recipe.prep_time = Some(30);
        recipe.cook_time = Some(60);

        let detail = RecipeDetail::from(recipe);
        assert_eq!(detail.total_time_display, "1 hours and 15 minutes");
        assert_eq!(detail.prep_time_display.as_deref(), Some("30 min"));
        assert_eq!(detail.cook_time_display.as_deref(), Some("1h"));
    }

    #[test]
    fn test_detail_without_prep_or_cook_time() {
        let encoded = serde_json::to_value(RecipeDetail::from(soup())).unwrap();
        assert_eq!(encoded["title"], "Soup");
        assert!(encoded.get("prep_time_display").is_none());
        assert!(encoded.get("cook_time_display").is_none());
    }
}
