//! API security tests
//!
//! Exercise the auth middleware and request validation without a live
//! database: the pool is lazy, so any request that is rejected before its
//! first query can be asserted end to end through the router.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use acadia_common::Role;
use acadia_server::auth::{token, AuthUser};
use acadia_server::config::AuthConfig;
use acadia_server::features::{self, AppState};
use acadia_server::storage::{config::StorageConfig, Storage};

const TEST_SECRET: &str = "api-security-test-secret";

async fn test_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgresql://localhost/acadia_test")
        .expect("lazy pool");

    let storage = Storage::new(StorageConfig::for_minio(
        "http://localhost:9000",
        "acadia-test",
    ))
    .await
    .expect("storage client");

    let state = AppState {
        db: pool,
        storage,
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            token_ttl_hours: 1,
        },
    };

    Router::new().nest("/api/v1", features::router(state))
}

fn bearer_token(role: Role) -> String {
    let user = AuthUser {
        user_id: Uuid::new_v4(),
        business_id: (role != Role::Superadmin).then(Uuid::new_v4),
        role,
    };
    token::generate_access_token(&user, TEST_SECRET, 1).expect("token")
}

#[tokio::test]
async fn test_protected_route_rejects_missing_token() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/businesses")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_garbage_token() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/businesses")
                .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_non_bearer_scheme() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/businesses")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_empty_credentials() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email": "", "password": ""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_exam_rejects_empty_name() {
    let app = test_app().await;
    let token = bearer_token(Role::Admin);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/businesses/{}/exams", Uuid::new_v4()))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name": ""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_exam_rejects_student_role() {
    let app = test_app().await;
    let token = bearer_token(Role::Student);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/businesses/{}/exams", Uuid::new_v4()))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name": "Midterm"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_business_rejects_non_superadmin() {
    let app = test_app().await;
    let token = bearer_token(Role::Admin);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/businesses")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name": "New School"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// A list request with explicit pagination must make it past query-string
// extraction; out-of-range values are then rejected by handler validation
// with the error envelope, not by the extractor.
#[tokio::test]
async fn test_list_pagination_params_reach_validation() {
    let app = test_app().await;
    let token = bearer_token(Role::Superadmin);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/businesses?page=0&per_page=5")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("VALIDATION_ERROR"), "unexpected body: {}", body);
    assert!(body.contains("Page must be greater than 0"), "unexpected body: {}", body);
}

#[tokio::test]
async fn test_create_permission_rejects_admin() {
    let app = test_app().await;
    let token = bearer_token(Role::Admin);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/permissions")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"code": "contents.upload"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
