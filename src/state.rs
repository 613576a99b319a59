use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::services::{AnnotationService, ImageService, LocalStorage};

/// Shared handler state. Cloning is cheap: the connection is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: LocalStorage,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let storage = LocalStorage::new(config.upload_dir.clone(), config.export_dir.clone());
        Self {
            db,
            storage,
            config: Arc::new(config),
        }
    }

    pub fn images(&self) -> ImageService {
        ImageService::new(
            self.db.clone(),
            self.storage.clone(),
            self.config.max_upload_bytes,
        )
    }

    pub fn annotations(&self) -> AnnotationService {
        AnnotationService::new(self.db.clone(), self.storage.clone())
    }
}
