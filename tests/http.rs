//! Health check, API docs and CORS behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, spawn_app, TEST_ORIGIN};

#[tokio::test]
async fn health_reports_database_status() {
    let app = spawn_app().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}

#[tokio::test]
async fn openapi_document_lists_annotation_routes() {
    let app = spawn_app().await;

    let response = app.get("/api-docs/openapi.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"]["/images/{id}/annotations"].is_object());
    assert!(json["paths"]["/images/{id}/download-annotations"].is_object());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = spawn_app().await;

    assert_eq!(app.get("/nowhere").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = spawn_app().await;

    let response = app
        .send(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/images/")
                .header("Origin", TEST_ORIGIN)
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        TEST_ORIGIN
    );
}
