//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use shop_api::auth::jwt::JwtConfig;
use shop_api::auth::password::hash_password;
use shop_api::config::ServerConfig;
use shop_api::router::build_app_router;
use shop_api::state::AppState;
use shop_db::models::item::{CreateItem, Item};
use shop_db::models::user::{CreateUser, User};
use shop_db::repositories::{ItemRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://testserver".to_string(),
        media_url: "/media/".to_string(),
        media_root: test_media_root(),
        min_password_length: 8,
        jwt: JwtConfig {
            secret: "integration-test-secret-with-enough-length".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Per-process media directory under the system temp dir.
pub fn test_media_root() -> PathBuf {
    std::env::temp_dir().join(format!("shop-api-media-{}", std::process::id()))
}

/// Build the production router over `pool` with [`test_config`].
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly, with [`TEST_PASSWORD`] as password.
pub async fn create_user(pool: &PgPool, username: &str, is_staff: bool) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            is_staff,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Mint an access token for `user` without going through the login endpoint.
pub fn token_for(user: &User) -> String {
    test_config()
        .jwt
        .issue(user.id, user.role())
        .expect("token generation should succeed")
}

/// Insert an item with a whole-unit price.
pub async fn create_item(pool: &PgPool, name: &str, category: &str, price: i64) -> Item {
    ItemRepo::create(
        pool,
        &CreateItem {
            name: name.to_string(),
            category: category.to_string(),
            price: Decimal::new(price * 100, 2),
            image: None,
        },
    )
    .await
    .expect("item creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), Some(body)).await
}

/// Send a pre-encoded body, for payloads `serde_json::Value` cannot express
/// (malformed JSON, multipart, a missing content type).
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"));
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    app.oneshot(builder.body(body.into()).unwrap()).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
