use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use ladle_core::Recipe;
use ladle_storage::RecipeDraft;

use crate::error::ApiError;
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Ladle Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.recipes.stats();
    let body = json!({
        "status": "ready",
        "storage": state.store.backend_name(),
        "cache_mode": cache.mode,
    });
    (StatusCode::OK, Json(body))
}

pub async fn metrics_text() -> impl IntoResponse {
    let rendered = crate::metrics::render_metrics().unwrap_or_default();
    (StatusCode::OK, rendered)
}

// ---- Recipe CRUD & search ----

/// GET /recipes
pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = state.recipes.get_all(state.store.as_ref()).await?;
    Ok(Json(recipes))
}

/// GET /recipes/{id}
///
/// Absent and malformed identifiers both answer 404; the store cannot
/// distinguish them and neither should the client.
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    match state.store.find_by_id(&id).await? {
        Some(recipe) => Ok(Json(recipe)),
        None => Err(ApiError::NotFound),
    }
}

/// POST /recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    payload: Result<Json<RecipeDraft>, JsonRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let Json(draft) = payload.map_err(|e| ApiError::bad_input(e.body_text()))?;

    let recipe = state.store.insert(draft).await?;
    // Invalidate only after the insert is confirmed, and finish before
    // reporting success: the next listing must repopulate from the store.
    state.recipes.invalidate().await;

    tracing::info!(id = %recipe.id, "recipe created");
    Ok(Json(recipe))
}

/// PUT /recipes/{id}
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RecipeDraft>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(draft) = payload.map_err(|e| ApiError::bad_input(e.body_text()))?;

    let updated = state.store.update(&id, draft).await?;
    if updated == 0 {
        return Err(ApiError::NotFound);
    }
    state.recipes.invalidate().await;

    tracing::info!(id = %id, "recipe updated");
    Ok(Json(json!({ "message": "Recipe has been updated" })))
}

/// DELETE /recipes/{id}
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.store.delete(&id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    state.recipes.invalidate().await;

    tracing::info!(id = %id, "recipe deleted");
    Ok(Json(json!({ "message": "Recipe has been deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub tag: String,
}

/// GET /recipes/search?tag=
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = state.store.find_by_tag(&params.tag).await?;
    if recipes.is_empty() {
        return Err(ApiError::SearchEmpty);
    }
    Ok(Json(recipes))
}
