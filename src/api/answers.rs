//! Answer API endpoints. Every answer route is scoped to its theme.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::{
    body, require, run_store, store_err, ApiResult, ANSWER_NOT_FOUND, THEME_NOT_FOUND,
};
use crate::errors::AppError;
use crate::ids::generate_id;
use crate::models::{next_timestamp, Answer, SubmitAnswerRequest, UpdateAnswerRequest};
use crate::AppState;

/// GET /api/themes/{theme_id}/answers - List a theme's answers, oldest first.
pub async fn list_answers(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
) -> ApiResult<Json<Vec<Answer>>> {
    let mut answers = run_store(&state, move |store| {
        store.get_theme(&theme_id)?;
        store.list_answers(&theme_id)
    })
    .await
    .map_err(store_err(THEME_NOT_FOUND, "Failed to fetch answers"))?;

    answers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(Json(answers))
}

/// GET /api/themes/{theme_id}/answers/{id} - Get a single answer.
pub async fn get_answer(
    State(state): State<AppState>,
    Path((theme_id, id)): Path<(String, String)>,
) -> ApiResult<Json<Answer>> {
    let answer = run_store(&state, move |store| store.get_answer(&id, &theme_id))
        .await
        .map_err(store_err(ANSWER_NOT_FOUND, "Failed to fetch answer"))?;
    Ok(Json(answer))
}

/// POST /api/themes/{theme_id}/answers - Submit an answer to an active theme.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
    payload: Bytes,
) -> ApiResult<(StatusCode, Json<Answer>)> {
    let lookup = theme_id.clone();
    let theme = run_store(&state, move |store| store.get_theme(&lookup))
        .await
        .map_err(store_err(THEME_NOT_FOUND, "Failed to fetch theme"))?;

    if !theme.active {
        return Err(AppError::InactiveResource(
            "Theme is not accepting answers".to_string(),
        ));
    }

    let request: SubmitAnswerRequest = body(&payload)?;
    require(&request.content, "Content is required")?;

    let answer = Answer::new(generate_id(), theme_id, request, Utc::now());
    // The theme may have been deleted since the check above; the store
    // reports that as NotFound.
    let created = run_store(&state, move |store| store.create_answer(answer))
        .await
        .map_err(store_err(THEME_NOT_FOUND, "Failed to submit answer"))?;

    tracing::info!("Created answer {} for theme {}", created.id, created.theme_id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/themes/{theme_id}/answers/{id} - Update an answer.
///
/// Blank content and zero likes keep the stored values.
pub async fn update_answer(
    State(state): State<AppState>,
    Path((theme_id, id)): Path<(String, String)>,
    payload: Bytes,
) -> ApiResult<Json<Answer>> {
    let request: UpdateAnswerRequest = body(&payload)?;

    let mut answer = run_store(&state, move |store| store.get_answer(&id, &theme_id))
        .await
        .map_err(store_err(ANSWER_NOT_FOUND, "Failed to fetch answer"))?;

    request.apply(&mut answer);
    answer.updated_at = next_timestamp(answer.updated_at);

    let updated = run_store(&state, move |store| store.update_answer(answer))
        .await
        .map_err(store_err(ANSWER_NOT_FOUND, "Failed to update answer"))?;
    Ok(Json(updated))
}

/// DELETE /api/themes/{theme_id}/answers/{id} - Delete an answer.
pub async fn delete_answer(
    State(state): State<AppState>,
    Path((theme_id, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    run_store(&state, move |store| store.delete_answer(&id, &theme_id))
        .await
        .map_err(store_err(ANSWER_NOT_FOUND, "Failed to delete answer"))?;
    Ok(StatusCode::NO_CONTENT)
}
