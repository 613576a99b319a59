use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::header,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::Annotation;
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct StatusResponse {
    status: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteAnnotationsResponse {
    status: String,
    deleted_count: u64,
}

#[utoipa::path(
    post,
    path = "/images/{id}/annotations",
    tag = "Annotations",
    params(
        ("id" = i32, Path, description = "Image ID")
    ),
    request_body = [Annotation],
    responses(
        (status = 200, description = "Annotations saved", body = StatusResponse),
        (status = 404, description = "Image not found"),
        (status = 422, description = "Annotation payload does not match box or polygon")
    )
)]
pub async fn add_annotations(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Vec<Value>>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Path(id) = id?;
    let Json(items) = payload?;
    state.annotations().annotate(id, items).await?;

    Ok(Json(StatusResponse {
        status: "annotations saved".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/images/{id}/annotations",
    tag = "Annotations",
    params(
        ("id" = i32, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Annotations in insertion order", body = [Annotation]),
        (status = 500, description = "Stored annotation could not be decoded")
    )
)]
pub async fn get_annotations(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<Annotation>>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.annotations().list(id).await?))
}

#[utoipa::path(
    get,
    path = "/images/{id}/download-annotations",
    tag = "Annotations",
    params(
        ("id" = i32, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Export file", content_type = "application/json"),
        (status = 404, description = "Image not found or no annotations found")
    )
)]
pub async fn download_annotations(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let artifact = state.annotations().export(id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.file_name),
        ),
    ];

    Ok((headers, artifact.body))
}

#[utoipa::path(
    delete,
    path = "/images/{id}/annotations",
    tag = "Annotations",
    params(
        ("id" = i32, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Annotations deleted", body = DeleteAnnotationsResponse),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_annotations(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteAnnotationsResponse>, AppError> {
    let Path(id) = id?;
    let deleted_count = state.annotations().delete_all(id).await?;

    Ok(Json(DeleteAnnotationsResponse {
        status: "annotations deleted".to_string(),
        deleted_count,
    }))
}
