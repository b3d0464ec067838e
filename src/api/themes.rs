//! Theme API endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::{body, require, run_store, store_err, ApiResult, THEME_NOT_FOUND};
use crate::ids::generate_id;
use crate::models::{next_timestamp, CreateThemeRequest, Theme, UpdateThemeRequest};
use crate::AppState;

/// GET /api/themes - List all themes, oldest first.
pub async fn list_themes(State(state): State<AppState>) -> ApiResult<Json<Vec<Theme>>> {
    let mut themes = run_store(&state, |store| store.list_themes())
        .await
        .map_err(store_err(THEME_NOT_FOUND, "Failed to fetch themes"))?;

    themes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(Json(themes))
}

/// GET /api/themes/{id} - Get a single theme.
pub async fn get_theme(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Theme>> {
    let theme = run_store(&state, move |store| store.get_theme(&id))
        .await
        .map_err(store_err(THEME_NOT_FOUND, "Failed to fetch theme"))?;
    Ok(Json(theme))
}

/// POST /api/themes - Create a new theme.
pub async fn create_theme(
    State(state): State<AppState>,
    payload: Bytes,
) -> ApiResult<(StatusCode, Json<Theme>)> {
    let request: CreateThemeRequest = body(&payload)?;

    // Validate required fields
    require(&request.title, "Title is required")?;

    let theme = Theme::new(generate_id(), request, Utc::now());
    let created = run_store(&state, move |store| store.create_theme(theme))
        .await
        .map_err(store_err(THEME_NOT_FOUND, "Failed to create theme"))?;

    tracing::info!("Created theme {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/themes/{id} - Update a theme.
///
/// Blank title or description in the payload keeps the stored value.
pub async fn update_theme(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Bytes,
) -> ApiResult<Json<Theme>> {
    let request: UpdateThemeRequest = body(&payload)?;

    let mut theme = run_store(&state, move |store| store.get_theme(&id))
        .await
        .map_err(store_err(THEME_NOT_FOUND, "Failed to fetch theme"))?;

    request.apply(&mut theme);
    theme.updated_at = next_timestamp(theme.updated_at);

    let updated = run_store(&state, move |store| store.update_theme(theme))
        .await
        .map_err(store_err(THEME_NOT_FOUND, "Failed to update theme"))?;
    Ok(Json(updated))
}

/// DELETE /api/themes/{id} - Delete a theme.
pub async fn delete_theme(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = id.clone();
    run_store(&state, move |store| store.delete_theme(&id))
        .await
        .map_err(store_err(THEME_NOT_FOUND, "Failed to delete theme"))?;

    tracing::info!("Deleted theme {}", deleted);
    Ok(StatusCode::NO_CONTENT)
}
