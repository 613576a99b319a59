pub mod annotation;
pub mod image;
