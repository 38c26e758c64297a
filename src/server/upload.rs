//! Image upload handling.
//!
//! Accepts a multipart form with an `image` field and copies the bytes into
//! the uploads directory. The canvas only stores the resulting URL, so
//! removing an image from the canvas later leaves the file behind.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use super::canvas::AppState;

/// Upload size cap, enforced as the request body limit on the upload route.
pub(crate) const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Response body for a stored upload.
#[derive(Serialize)]
struct UploadResponse {
    filename: String,
}

/// Stores the `image` field of a multipart form and returns its filename.
///
/// The client builds the canvas URL as `/uploads/{filename}`. Uploading the
/// same filename twice overwrites the earlier file.
pub async fn upload_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    if let Err(e) = tokio::fs::create_dir_all(&state.upload_dir).await {
        tracing::error!(
            "failed to create upload directory {}: {}",
            state.upload_dir.display(),
            e
        );
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to store upload".to_string(),
        )
            .into_response();
    }

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("could not parse multipart form: {}", e),
                )
                    .into_response();
            }
        };

        if field.name() != Some("image") {
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or_default());
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("could not read uploaded file: {}", e),
                )
                    .into_response();
            }
        };

        let dest = state.upload_dir.join(&filename);
        if let Err(e) = tokio::fs::write(&dest, &data).await {
            tracing::error!("failed to write {}: {}", dest.display(), e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to store upload".to_string(),
            )
                .into_response();
        }

        tracing::info!("stored upload {} ({} bytes)", filename, data.len());
        return Json(UploadResponse { filename }).into_response();
    }

    (
        StatusCode::BAD_REQUEST,
        "missing image field".to_string(),
    )
        .into_response()
}

/// Reduces a client-supplied filename to a safe base name.
///
/// Path components are stripped so an upload can never land outside the
/// uploads directory. Names that reduce to nothing get a generated one.
fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    if base.is_empty() || base == "." || base == ".." {
        format!("upload-{}", Uuid::new_v4())
    } else {
        base.to_string()
    }
}
