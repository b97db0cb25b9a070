//! Router-level tests for the authentication middleware and the error
//! envelope, without a live database.
//!
//! The pool is built lazily against an unroutable address, so routes
//! that stop at the middleware or at query validation never touch it,
//! and the health probe reports a degraded status.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Duration;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::Service as _;

use staffdir_api::app::{build_router, AppState};
use staffdir_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use staffdir_shared::auth::jwt::{create_token, Claims};

const TEST_SECRET: &str = "router-test-secret-with-enough-length!!";

fn test_app() -> axum::Router {
    let config = Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgresql://127.0.0.1:1/staffdir".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    };

    // lazy pool: no connection is attempted until a query runs
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database.url)
        .unwrap();

    build_router(AppState::new(pool, config))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn bearer_token(role: &str) -> String {
    let claims = Claims::new(uuid::Uuid::new_v4(), role);
    create_token(&claims, TEST_SECRET).unwrap()
}

#[tokio::test]
async fn missing_authorization_header_is_unauthorized() {
    let mut app = test_app();

    let request = Request::builder()
        .uri("/v1/accounts")
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Missing authorization header");
}

#[tokio::test]
async fn non_bearer_scheme_is_a_bad_request() {
    let mut app = test_app();

    let request = Request::builder()
        .uri("/v1/accounts")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn garbage_bearer_token_is_unauthorized() {
    let mut app = test_app();

    let request = Request::builder()
        .uri("/v1/accounts")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let mut app = test_app();

    let claims = Claims::with_expiration(uuid::Uuid::new_v4(), "admin", Duration::hours(-1));
    let token = create_token(&claims, TEST_SECRET).unwrap();

    let request = Request::builder()
        .uri("/v1/accounts")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn invalid_sort_field_is_a_validation_error() {
    let mut app = test_app();

    // query validation rejects the request before any repository call
    let request = Request::builder()
        .uri("/v1/accounts?sort_field=bogus")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", bearer_token("admin")),
        )
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "sort_field");
}

#[tokio::test]
async fn health_check_is_public_and_reports_database_state() {
    let mut app = test_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}
