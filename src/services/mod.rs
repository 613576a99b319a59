pub mod annotations;
pub mod images;
pub mod storage;

pub use annotations::AnnotationService;
pub use images::ImageService;
pub use storage::LocalStorage;
