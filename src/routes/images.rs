use axum::{
    body::Bytes,
    extract::{multipart::Field, rejection::PathRejection, Multipart, Path, State},
    response::Json,
};
use serde::Serialize;

use crate::error::AppError;
use crate::models::ImageSummary;
use crate::services::images::{check_file_size, BulkUploadReport, UploadFailure, UploadedFile};
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteImageResponse {
    status: String,
    message: String,
}

/// Reads one file part, giving up as soon as it grows past `max_file_bytes`.
async fn read_file(mut field: Field<'_>, max_file_bytes: usize) -> Result<UploadedFile, AppError> {
    let file_name = field.file_name().unwrap_or("unknown").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        check_file_size(data.len() + chunk.len(), max_file_bytes)?;
        data.extend_from_slice(&chunk);
    }

    Ok(UploadedFile {
        file_name,
        content_type,
        data: Bytes::from(data),
    })
}

#[utoipa::path(
    post,
    path = "/images/",
    tag = "Images",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image uploaded successfully", body = ImageSummary),
        (status = 400, description = "Invalid image format or missing file field"),
        (status = 413, description = "File exceeds the upload limit"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageSummary>, AppError> {
    let max_file_bytes = state.config.max_upload_bytes;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let file = read_file(field, max_file_bytes).await?;
            let summary = state.images().upload(file).await?;
            return Ok(Json(summary));
        }
    }

    tracing::info!("Upload | POST /images/ | res=400 | No file field found");
    Err(AppError::BadRequest("No file field found".to_string()))
}

#[utoipa::path(
    post,
    path = "/images/bulk",
    tag = "Images",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per-file upload results", body = BulkUploadReport),
        (status = 400, description = "Malformed multipart body"),
        (status = 413, description = "Request exceeds the bulk upload limit")
    )
)]
pub async fn bulk_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BulkUploadReport>, AppError> {
    let max_file_bytes = state.config.max_upload_bytes;
    let mut files = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if files.is_empty() => return Err(e.into()),
            // Report whatever was collected before the stream broke.
            Err(e) => {
                tracing::warn!(error = %e.body_text(), "Bulk upload stream ended early");
                break;
            }
        };

        if !matches!(field.name(), Some("files") | Some("file")) {
            continue;
        }

        let filename = field.file_name().unwrap_or("unknown").to_string();
        files.push(read_file(field, max_file_bytes).await.map_err(|e| UploadFailure {
            filename,
            error: e.client_message(),
        }));
    }

    let report = state.images().bulk_upload(files).await;
    tracing::info!(
        total = report.total,
        success_count = report.success_count,
        error_count = report.error_count,
        "Bulk upload finished"
    );
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/images/",
    tag = "Images",
    responses(
        (status = 200, description = "All stored images", body = [ImageSummary]),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<ImageSummary>>, AppError> {
    Ok(Json(state.images().list().await?))
}

#[utoipa::path(
    get,
    path = "/images/{id}",
    tag = "Images",
    params(
        ("id" = i32, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image details", body = ImageSummary),
        (status = 404, description = "Image not found")
    )
)]
pub async fn get_image(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ImageSummary>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.images().get(id).await?))
}

#[utoipa::path(
    delete,
    path = "/images/{id}",
    tag = "Images",
    params(
        ("id" = i32, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image, its annotations and its file deleted", body = DeleteImageResponse),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_image(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteImageResponse>, AppError> {
    let Path(id) = id?;
    let deleted_annotations = state.images().delete(id).await?;

    Ok(Json(DeleteImageResponse {
        status: "deleted".to_string(),
        message: format!("Image {id} and {deleted_annotations} annotation(s) deleted"),
    }))
}
