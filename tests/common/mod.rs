//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use errorh::http::ErrorBody;
use errorh::{HttpError, Site};
use tower::ServiceExt;

/// Directory holding `index.html`, `404.html`, `50x.html` and `docs/`.
pub fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/public")
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures().join(name)).unwrap()
}

/// Site with the handlers the scenarios exercise.
pub fn app() -> Site {
    Site::new()
        .route("/ok", get(|| async { "fine" }))
        .route("/error", get(|| async { HttpError::bad_implementation("boom") }))
        .route("/none", get(|| async { HttpError::not_implemented() }))
        .route("/teapot", get(|| async { HttpError::from_status(StatusCode::IM_A_TEAPOT) }))
}

/// Add the opted-out `/disabled` route, as the opt-out scenario does after
/// registration.
pub fn with_disabled_route(site: Site) -> Site {
    site.route("/disabled", get(|| async { HttpError::not_found() }))
        .disable_interception("/disabled")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }

    pub fn json(&self) -> ErrorBody {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Drive `router` in-process with a single request.
pub async fn send(router: Router, method: Method, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    TestResponse { status, headers, body }
}

pub async fn get_path(router: Router, uri: &str) -> TestResponse {
    send(router, Method::GET, uri).await
}
