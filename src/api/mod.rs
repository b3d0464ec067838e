//! REST API module.
//!
//! One handler per theme/answer operation. Handlers decode and validate the
//! request, run the store call on the blocking pool and map the outcome.

mod answers;
mod themes;

pub use answers::*;
pub use themes::*;

use std::sync::Arc;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::db::{DataStore, StoreError, StoreResult};
use crate::errors::AppError;
use crate::AppState;

const THEME_NOT_FOUND: &str = "Theme not found";
const ANSWER_NOT_FOUND: &str = "Answer not found";

/// Handler result; errors render as `{"error": ...}`.
pub type ApiResult<T> = Result<T, AppError>;

/// Run a store call on the blocking thread pool.
async fn run_store<F, T>(state: &AppState, call: F) -> StoreResult<T>
where
    F: FnOnce(&dyn DataStore) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || call(store.as_ref()))
        .await
        .map_err(|e| StoreError::Worker(e.to_string()))?
}

/// Map store errors for one operation.
fn store_err(
    not_found: &'static str,
    failure: &'static str,
) -> impl FnOnce(StoreError) -> AppError {
    move |err| AppError::from_store(err, not_found, failure)
}

/// Decode a JSON body whatever its `Content-Type`; failures become a 400.
fn body<T: DeserializeOwned>(payload: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(payload).map_err(AppError::from)
}

/// Fallback for unmatched `/api` paths, so they never reach static files.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Reject blank required fields.
fn require(value: &str, message: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
