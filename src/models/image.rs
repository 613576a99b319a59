use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::image;

/// Path prefix under which uploaded files are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// A stored image. `filename` is the generated on-disk name, never the client's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub id: i32,
    pub filename: String,
}

impl Image {
    pub fn url(&self) -> String {
        format!("{}/{}", UPLOADS_URL_PREFIX, self.filename)
    }

    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            image_id: self.id,
            url: self.url(),
        }
    }
}

impl From<image::Model> for Image {
    fn from(model: image::Model) -> Self {
        Self {
            id: model.id,
            filename: model.filename,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImageSummary {
    pub image_id: i32,
    pub url: String,
}
