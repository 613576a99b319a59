use axum::body::Bytes;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::ImageSummary;
use crate::repos::{AnnotationRepo, ImageRepo};
use crate::services::storage::LocalStorage;

pub const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/jpg", "image/webp"];

/// One file taken off a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadedImage {
    pub image_id: i32,
    pub url: String,
    /// Name the client sent, not the stored name.
    pub filename: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadFailure {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BulkUploadReport {
    pub uploaded: Vec<UploadedImage>,
    pub errors: Vec<UploadFailure>,
    pub total: usize,
    pub success_count: usize,
    pub error_count: usize,
}

pub struct ImageService {
    db: DatabaseConnection,
    storage: LocalStorage,
    max_file_bytes: usize,
}

// Keeps the leading dot; anything that is not a plain alphanumeric extension is dropped.
fn get_extension(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

fn generate_filename(original: &str) -> String {
    format!("{}{}", Uuid::new_v4(), get_extension(original))
}

fn check_content_type(content_type: &str) -> Result<(), AppError> {
    if ALLOWED_CONTENT_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(AppError::InvalidFormat("Invalid image format".to_string()))
    }
}

pub fn check_file_size(len: usize, max_file_bytes: usize) -> Result<(), AppError> {
    if len > max_file_bytes {
        Err(AppError::PayloadTooLarge(format!(
            "File exceeds the {max_file_bytes} byte upload limit"
        )))
    } else {
        Ok(())
    }
}

impl ImageService {
    pub fn new(db: DatabaseConnection, storage: LocalStorage, max_file_bytes: usize) -> Self {
        Self {
            db,
            storage,
            max_file_bytes,
        }
    }

    /// Writes the bytes first, then records the image, so no row ever points
    /// at a missing file.
    pub async fn upload(&self, file: UploadedFile) -> Result<ImageSummary, AppError> {
        check_content_type(&file.content_type)?;
        check_file_size(file.data.len(), self.max_file_bytes)?;

        let filename = generate_filename(&file.file_name);
        self.storage.put_object(&filename, &file.data).await?;

        let image = match ImageRepo::create(&self.db, &filename).await {
            Ok(image) => image,
            Err(e) => {
                self.remove_file(&filename).await;
                return Err(e.into());
            }
        };

        tracing::info!(image_id = image.id, filename = %image.filename, size = file.data.len(), "Image uploaded");
        Ok(image.summary())
    }

    /// Each file succeeds or fails on its own; one bad file never aborts the batch.
    /// Items that already failed while being read are reported as they are.
    pub async fn bulk_upload(&self, files: Vec<Result<UploadedFile, UploadFailure>>) -> BulkUploadReport {
        let total = files.len();
        let mut uploaded = Vec::new();
        let mut errors = Vec::new();

        for file in files {
            let file = match file {
                Ok(file) => file,
                Err(failure) => {
                    tracing::warn!(filename = %failure.filename, error = %failure.error, "Bulk upload item unreadable");
                    errors.push(failure);
                    continue;
                }
            };
            let original = file.file_name.clone();
            match self.upload(file).await {
                Ok(summary) => uploaded.push(UploadedImage {
                    image_id: summary.image_id,
                    url: summary.url,
                    filename: original,
                }),
                Err(e) => {
                    tracing::warn!(filename = %original, error = %e, "Bulk upload item failed");
                    errors.push(UploadFailure {
                        filename: original,
                        error: e.client_message(),
                    });
                }
            }
        }

        BulkUploadReport {
            success_count: uploaded.len(),
            error_count: errors.len(),
            uploaded,
            errors,
            total,
        }
    }

    pub async fn list(&self) -> Result<Vec<ImageSummary>, AppError> {
        Ok(ImageRepo::list(&self.db).await?)
    }

    pub async fn get(&self, image_id: i32) -> Result<ImageSummary, AppError> {
        ImageRepo::get(&self.db, image_id)
            .await?
            .map(|image| image.summary())
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))
    }

    /// Deletes annotations and the image row together, then removes the file.
    /// Returns the number of annotations that went with it.
    pub async fn delete(&self, image_id: i32) -> Result<u64, AppError> {
        let txn = self.db.begin().await?;

        let deleted_annotations = AnnotationRepo::delete_by_image(&txn, image_id).await?;
        let Some(filename) = ImageRepo::delete(&txn, image_id).await? else {
            return Err(AppError::NotFound("Image not found".to_string()));
        };

        txn.commit().await?;

        self.remove_file(&filename).await;
        tracing::info!(image_id, deleted_annotations, "Image deleted");
        Ok(deleted_annotations)
    }

    async fn remove_file(&self, filename: &str) {
        if let Err(e) = self.storage.delete_object(filename).await {
            tracing::warn!(filename, error = %e, "Failed to remove image file");
        }
    }
}
