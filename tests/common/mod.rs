#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use annotation_kit::config::Config;
use annotation_kit::routes::create_routes;
use annotation_kit::state::AppState;

pub const BOUNDARY: &str = "----WebKitFormBoundary7MA4YWxkTrZu0gW";
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// A fully wired router over a throwaway SQLite file and storage directories.
/// The temp dir lives as long as the struct.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_limits(10 * 1024 * 1024, 200 * 1024 * 1024).await
}

/// Same as `spawn_app`, with explicit per-file and bulk request caps.
pub async fn spawn_app_with_limits(max_upload_bytes: usize, max_bulk_upload_bytes: usize) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let database_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

    let db = Database::connect(database_url.as_str())
        .await
        .expect("Failed to open test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let config = Config {
        database_url,
        upload_dir: dir.path().join("uploads"),
        export_dir: dir.path().join("exports"),
        cors_origins: vec![TEST_ORIGIN.to_string()],
        max_upload_bytes,
        max_bulk_upload_bytes,
    };

    let state = AppState::new(db, config);
    state
        .storage
        .ensure_dirs()
        .await
        .expect("Failed to create storage dirs");

    TestApp {
        router: create_routes(state.clone()),
        state,
        dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Uploads one file through `POST /images/` and returns the new image id.
    pub async fn upload(&self, filename: &str, content_type: &str) -> i64 {
        let response = self
            .send(multipart_request(
                "/images/",
                &[("file", filename, content_type, b"\x89PNG fake image bytes")],
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["image_id"]
            .as_i64()
            .expect("image_id must be an integer")
    }

    pub fn upload_dir_entries(&self) -> usize {
        std::fs::read_dir(self.dir.path().join("uploads"))
            .unwrap()
            .count()
    }
}

/// Builds a multipart request from `(field, filename, content_type, bytes)` parts.
pub fn multipart_request(uri: &str, parts: &[(&str, &str, &str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (field, filename, content_type, data) in parts {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, field, filename, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 10 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Response body is not JSON")
}
