use std::path::PathBuf;

use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::error::AppError;
use crate::models::Annotation;
use crate::repos::{AnnotationRepo, ImageRepo};
use crate::services::storage::LocalStorage;

/// The JSON file materialized on disk by an export.
#[derive(Debug)]
pub struct ExportArtifact {
    pub file_name: String,
    pub path: PathBuf,
    pub body: Vec<u8>,
}

pub struct AnnotationService {
    db: DatabaseConnection,
    storage: LocalStorage,
}

/// Checks every item against the Box/Polygon shapes. The first bad item
/// rejects the whole batch.
pub fn parse_batch(items: Vec<Value>) -> Result<Vec<Annotation>, AppError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| AppError::Validation(format!("annotations[{index}]: {e}")))
        })
        .collect()
}

pub fn export_file_name(image_id: i32) -> String {
    format!("{image_id}_annotations.json")
}

impl AnnotationService {
    pub fn new(db: DatabaseConnection, storage: LocalStorage) -> Self {
        Self { db, storage }
    }

    pub async fn annotate(&self, image_id: i32, items: Vec<Value>) -> Result<usize, AppError> {
        let annotations = parse_batch(items)?;
        self.require_image(image_id).await?;

        let saved = AnnotationRepo::save_batch(&self.db, image_id, &annotations).await?;
        tracing::info!(image_id, saved, "Annotations saved");
        Ok(saved)
    }

    pub async fn list(&self, image_id: i32) -> Result<Vec<Annotation>, AppError> {
        Ok(AnnotationRepo::by_image(&self.db, image_id).await?)
    }

    pub async fn delete_all(&self, image_id: i32) -> Result<u64, AppError> {
        self.require_image(image_id).await?;

        let deleted = AnnotationRepo::delete_by_image(&self.db, image_id).await?;
        tracing::info!(image_id, deleted, "Annotations deleted");
        Ok(deleted)
    }

    /// Serializes the image's annotations to its export file, replacing any
    /// earlier export. A missing image and an image with no annotations are
    /// both 404s, told apart by message.
    pub async fn export(&self, image_id: i32) -> Result<ExportArtifact, AppError> {
        self.require_image(image_id).await?;

        let annotations = AnnotationRepo::by_image(&self.db, image_id).await?;
        if annotations.is_empty() {
            return Err(AppError::NotFound("No annotations found".to_string()));
        }

        let body = serde_json::to_vec(&annotations)
            .map_err(|e| AppError::InternalServerError(format!("Failed to serialize export: {e}")))?;

        let file_name = export_file_name(image_id);
        let path = self.storage.write_export(&file_name, &body).await?;

        tracing::info!(image_id, count = annotations.len(), path = %path.display(), "Annotations exported");
        Ok(ExportArtifact {
            file_name,
            path,
            body,
        })
    }

    async fn require_image(&self, image_id: i32) -> Result<(), AppError> {
        match ImageRepo::get(&self.db, image_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Image not found".to_string())),
        }
    }
}
