//! Persistence layer: explicit repositories over the `images` and `annotations` tables.
//!
//! Every function takes the connection (or transaction) to run on, so callers
//! decide the scope of each unit of work.

pub mod annotation;
pub mod error;
pub mod image;

pub use annotation::AnnotationRepo;
pub use error::RepoError;
pub use image::ImageRepo;
