pub mod annotation;
pub mod image;

pub use annotation::Annotation;
pub use image::{Image, ImageSummary, UPLOADS_URL_PREFIX};
