//! HTTP-level tests for the `/projects` routes.
//!
//! These exercise request validation and the auth gate, which reject before
//! any database or AWS call is made, so no live backends are needed.

mod common;

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Listing: query validation
// ---------------------------------------------------------------------------

/// `page=0` violates the `page >= 1` rule and is rejected up front.
#[tokio::test]
async fn list_rejects_page_zero() {
    let app = common::build_test_app().await;
    let response = get(app, "/api/v1/projects?page=0").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    let message = json["error"].as_str().unwrap();
    assert!(
        message.contains("page must be >= 1"),
        "unexpected message: {message}"
    );
}

/// `page_size` is capped at 100.
#[tokio::test]
async fn list_rejects_oversized_page_size() {
    let app = common::build_test_app().await;
    let response = get(app, "/api/v1/projects?page_size=101").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

/// A timestamp that is not RFC 3339 fails query deserialization.
#[tokio::test]
async fn list_rejects_malformed_timestamp() {
    let app = common::build_test_app().await;
    let response = get(app, "/api/v1/projects?start_time=yesterday").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Content routes: bearer-token gate
// ---------------------------------------------------------------------------

/// Content routes reject requests without an Authorization header.
#[tokio::test]
async fn metadata_requires_bearer_token() {
    let app = common::build_test_app().await;
    let response = get(app, "/api/v1/projects/42/metadata").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

/// A non-Bearer Authorization scheme is rejected with a hint.
#[tokio::test]
async fn metadata_rejects_non_bearer_scheme() {
    let app = common::build_test_app().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/projects/42/ppm")
        .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Invalid Authorization format. Expected: Bearer <token>"
    );
}

/// Every project-scoped content route sits behind the same gate.
#[tokio::test]
async fn all_content_routes_require_auth() {
    let paths = [
        "/api/v1/projects/7/metadata",
        "/api/v1/projects/7/ppm",
        "/api/v1/projects/7/ppm/video_concept",
        "/api/v1/projects/7/script",
        "/api/v1/projects/7/assets",
        "/api/v1/projects/7/creative-brief",
        "/api/v1/projects/7/assets-script",
    ];

    for path in paths {
        let app = common::build_test_app().await;
        let response = get(app, path).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {path}"
        );
    }
}

// ---------------------------------------------------------------------------
// Method handling
// ---------------------------------------------------------------------------

/// The listing route only accepts GET.
#[tokio::test]
async fn list_rejects_post() {
    let app = common::build_test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/projects")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
