//! Product image upload handler.
//!
//! Accepts a multipart `file` field, stores it under the configured upload
//! directory with a fresh UUID name, and returns the public URL. The
//! product payload then references that URL (the create/edit flow uploads
//! first, submits second).

use axum::{Json, extract::Multipart, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AdminError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Accepted image extensions.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Maximum upload size in bytes (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Store an uploaded image and return its public URL.
#[instrument(skip(admin, state, multipart))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit('.').next())
            .map(str::to_lowercase)
            .ok_or_else(|| AdminError::BadRequest("file name is required".to_owned()))?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AdminError::BadRequest(format!(
                "unsupported image type .{extension}; use one of: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AdminError::BadRequest(format!("failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AdminError::BadRequest("uploaded file is empty".to_owned()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AdminError::BadRequest(format!(
                "file exceeds the {} MiB limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        let filename = format!("{}.{extension}", Uuid::new_v4());
        let dir = &state.config().upload_dir;

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AdminError::Internal(format!("failed to create upload dir: {e}")))?;
        tokio::fs::write(dir.join(&filename), &data)
            .await
            .map_err(|e| AdminError::Internal(format!("failed to store upload: {e}")))?;

        let url = state.config().upload_url(&filename);

        tracing::info!(
            admin_id = %admin.id,
            filename = %filename,
            bytes = data.len(),
            "image uploaded"
        );

        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }

    Err(AdminError::BadRequest(
        "multipart field 'file' is required".to_owned(),
    ))
}
