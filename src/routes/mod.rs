pub mod annotations;
pub mod health;
pub mod images;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models::UPLOADS_URL_PREFIX;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        images::upload_image,
        images::bulk_upload,
        images::list_images,
        images::get_image,
        images::delete_image,
        annotations::add_annotations,
        annotations::get_annotations,
        annotations::download_annotations,
        annotations::delete_annotations,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::models::ImageSummary,
            crate::models::Annotation,
            crate::services::images::BulkUploadReport,
            crate::services::images::UploadedImage,
            crate::services::images::UploadFailure,
            images::DeleteImageResponse,
            annotations::StatusResponse,
            annotations::DeleteAnnotationsResponse,
        )
    ),
    tags(
        (name = "General", description = "Service health"),
        (name = "Images", description = "Upload, list and delete images"),
        (name = "Annotations", description = "Save, fetch, export and delete image annotations")
    ),
    info(
        title = "AnnotationKit API",
        version = "0.1.0",
        description = "Image upload and box/polygon annotation storage",
    )
)]
struct ApiDoc;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn create_routes(state: AppState) -> Router {
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let cors = cors_layer(&state.config.cors_origins);
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let bulk_body_limit = state.config.max_bulk_upload_bytes;
    let uploads = ServeDir::new(state.storage.upload_dir());

    let app_routes = Router::new()
        .route("/health", get(health::health))
        .route("/images", get(images::list_images).post(images::upload_image))
        .route("/images/", get(images::list_images).post(images::upload_image))
        .route(
            "/images/bulk",
            post(images::bulk_upload).layer(DefaultBodyLimit::max(bulk_body_limit)),
        )
        .route(
            "/images/{id}",
            get(images::get_image).delete(images::delete_image),
        )
        .route(
            "/images/{id}/annotations",
            get(annotations::get_annotations)
                .post(annotations::add_annotations)
                .delete(annotations::delete_annotations),
        )
        .route(
            "/images/{id}/download-annotations",
            get(annotations::download_annotations),
        )
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
