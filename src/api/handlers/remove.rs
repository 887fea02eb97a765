use crate::AppState;
use crate::api::error::AppError;
use crate::services::storage::Area;
use crate::utils::validation::{is_allowed_extension, processed_filename, unique_filename};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct RemoveResponse {
    /// Relative address of the stored upload
    pub original: String,
    /// Relative address of the background-removed PNG
    pub processed: String,
}

/// The `image` multipart field as received, before any validation
struct ImageField {
    filename: String,
    data: Bytes,
}

/// Pulls the `image` field out of the multipart body.
///
/// Body-limit violations surface here as multipart read errors, so they are
/// mapped to 413 before any validation runs, mirroring enforcement at the
/// boundary.
async fn read_image_field(
    multipart: &mut Multipart,
    state: &AppState,
) -> Result<Option<ImageField>, AppError> {
    let map_err = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE
            || e.to_string().contains("length limit exceeded")
        {
            AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {} MB.",
                state.config.max_content_length_mb()
            ))
        } else {
            AppError::BadRequest(e.to_string())
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(map_err)? {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(map_err)?;

        return Ok(Some(ImageField { filename, data }));
    }

    Ok(None)
}

/// Shared pipeline: store the upload, invoke the remover, store the result.
///
/// On a processing failure the upload stays on disk; the sweeper reclaims
/// it once it ages out.
async fn process_upload(state: &AppState, field: &ImageField) -> Result<(String, String), AppError> {
    let upload_name = unique_filename(&field.filename);
    state
        .storage
        .store(Area::Uploads, &upload_name, &field.data)
        .await?;
    tracing::info!(name = %upload_name, size = field.data.len(), "Stored upload");

    let output = state.remover.remove_background(&field.data).await?;

    let processed_name = processed_filename(&upload_name);
    state
        .storage
        .store(Area::Processed, &processed_name, &output)
        .await?;
    tracing::info!(name = %processed_name, size = output.len(), "Stored processed result");

    Ok((upload_name, processed_name))
}

#[utoipa::path(
    post,
    path = "/remove",
    request_body(content = Multipart, description = "Image upload, field name `image`"),
    responses(
        (status = 200, description = "Background removed", body = RemoveResponse),
        (status = 400, description = "Validation failure"),
        (status = 413, description = "Payload too large"),
        (status = 500, description = "Processing failure")
    ),
    tag = "remove"
)]
pub async fn remove_bg(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RemoveResponse>, AppError> {
    let field = read_image_field(&mut multipart, &state)
        .await?
        .ok_or_else(|| AppError::BadRequest("No image file provided.".to_string()))?;

    if field.filename.is_empty() {
        return Err(AppError::BadRequest("No file selected.".to_string()));
    }

    if !is_allowed_extension(&field.filename) {
        return Err(AppError::BadRequest(
            "Invalid file type. Only JPG, JPEG, and PNG are accepted.".to_string(),
        ));
    }

    let (upload_name, processed_name) = process_upload(&state, &field).await?;

    Ok(Json(RemoveResponse {
        original: state.storage.public_path(Area::Uploads, &upload_name),
        processed: state.storage.public_path(Area::Processed, &processed_name),
    }))
}

#[utoipa::path(
    post,
    path = "/api/remove",
    request_body(content = Multipart, description = "Image upload, field name `image`"),
    responses(
        (status = 200, description = "Processed PNG bytes", body = Vec<u8>, content_type = "image/png"),
        (status = 400, description = "Validation failure"),
        (status = 413, description = "Payload too large"),
        (status = 500, description = "Processing failure")
    ),
    tag = "remove"
)]
pub async fn api_remove_bg(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let field = read_image_field(&mut multipart, &state)
        .await?
        .ok_or_else(|| AppError::BadRequest("No image file provided.".to_string()))?;

    if field.filename.is_empty() || !is_allowed_extension(&field.filename) {
        return Err(AppError::BadRequest("Invalid or missing file.".to_string()));
    }

    let (_, processed_name) = process_upload(&state, &field).await?;

    // Read back from the processed area instead of echoing the in-memory
    // bytes. The sweeper may have deleted the file already; that surfaces
    // as Gone rather than a success with stale data.
    let png = state.storage.read(Area::Processed, &processed_name).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"removed_bg.png\"",
            ),
        ],
        png,
    )
        .into_response())
}
