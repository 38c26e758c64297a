//! Server-side modules for the inkpad canvas server.

pub mod canvas;
pub mod upload;

pub use canvas::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use canvas::{load_canvas, save_canvas};
use upload::{upload_image, MAX_UPLOAD_BYTES};

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the full application router.
///
/// CORS is permissive: the canvas client is typically served from a
/// different origin than this API.
pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.upload_dir);

    Router::new()
        .route("/health", get(health))
        .route("/api/canvas/save", post(save_canvas))
        .route("/api/canvas/load", get(load_canvas))
        .route(
            "/api/upload",
            post(upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest_service("/uploads", uploads)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
