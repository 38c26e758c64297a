//! HTTP handlers for canvas save and load.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sqlx::SqlitePool;
use std::path::PathBuf;

use crate::db::{CanvasError, CanvasRepository};
use crate::models::ChangeBatch;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub upload_dir: PathBuf,
}

/// Applies one client change batch to storage.
///
/// Success is 201 with an empty body; server-assigned ids are not echoed
/// back, the client reloads to pick them up. A body that does not decode
/// into a batch is rejected by the extractor before this runs.
pub async fn save_canvas(
    State(state): State<AppState>,
    Json(batch): Json<ChangeBatch>,
) -> Response {
    let repo = CanvasRepository::new(state.pool.clone());
    match repo.apply_batch(&batch).await {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => {
            tracing::error!("failed to apply canvas batch: {}", e);
            error_response(e)
        }
    }
}

/// Returns the full current canvas state.
pub async fn load_canvas(State(state): State<AppState>) -> Response {
    let repo = CanvasRepository::new(state.pool.clone());
    match repo.snapshot().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            tracing::error!("failed to read canvas snapshot: {}", e);
            error_response(e)
        }
    }
}

/// Maps storage errors onto status codes with a plain-text reason.
fn error_response(err: CanvasError) -> Response {
    let status = match &err {
        CanvasError::BadRequest(_) => StatusCode::BAD_REQUEST,
        CanvasError::NotFound(_) => StatusCode::NOT_FOUND,
        CanvasError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string()).into_response()
}
