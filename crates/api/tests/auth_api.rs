//! HTTP-level integration tests for the `/auth` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use serde_json::json;
use shop_db::repositories::UserRepo;
use sqlx::PgPool;

/// Obtain a token pair via the API.
async fn obtain_tokens(pool: &PgPool, username: &str, password: &str) -> serde_json::Value {
    let body = json!({ "username": username, "password": password });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/token", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_creates_customer(pool: PgPool) {
    let body = json!({
        "username": "newbie",
        "password": "long-enough-pw",
        "email": "newbie@example.com",
        "first_name": "New",
    });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "newbie");
    assert_eq!(json["data"]["role"], "customer");
    assert!(json["data"].get("password_hash").is_none());

    // The new account can log in straight away.
    let tokens = obtain_tokens(&pool, "newbie", "long-enough-pw").await;
    assert_eq!(tokens["user"]["role"], "customer");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_accepts_empty_email(pool: PgPool) {
    let body = json!({ "username": "noemail", "password": "long-enough-pw", "email": "" });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_bad_input(pool: PgPool) {
    for body in [
        json!({ "username": "", "password": "long-enough-pw" }),
        json!({ "username": "shorty", "password": "short" }),
        json!({ "username": "bademail", "password": "long-enough-pw", "email": "not-an-email" }),
    ] {
        let response =
            post_json(common::build_test_app(pool.clone()), "/api/v1/auth/register", body.clone()).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "body {body} should be rejected"
        );
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_duplicate_username_conflicts(pool: PgPool) {
    create_user(&pool, "taken", false).await;

    let body = json!({ "username": "taken", "password": "long-enough-pw" });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Token issuance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn token_success_returns_pair(pool: PgPool) {
    let user = create_user(&pool, "staffer", true).await;

    let json = obtain_tokens(&pool, "staffer", TEST_PASSWORD).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "staff");

    // The access token authenticates cart requests.
    let access = json["access_token"].as_str().unwrap();
    let response = get_auth(common::build_test_app(pool), "/api/v1/cart", access).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn token_with_bad_credentials_is_401(pool: PgPool) {
    create_user(&pool, "someone", false).await;

    for body in [
        json!({ "username": "someone", "password": "wrong-password" }),
        json!({ "username": "ghost", "password": TEST_PASSWORD }),
    ] {
        let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/token", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn token_for_inactive_user_is_403(pool: PgPool) {
    let user = create_user(&pool, "inactive", false).await;
    UserRepo::deactivate(&pool, user.id).await.unwrap();

    let body = json!({ "username": "inactive", "password": TEST_PASSWORD });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/token", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Refresh and logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_tokens(pool: PgPool) {
    create_user(&pool, "refresher", false).await;
    let tokens = obtain_tokens(&pool, "refresher", TEST_PASSWORD).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    let body = json!({ "refresh_token": refresh_token });
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/token/refresh",
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"].as_str().unwrap(), refresh_token);

    // The old refresh token is now revoked.
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/token/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_with_garbage_token_is_401(pool: PgPool) {
    let body = json!({ "refresh_token": "not-a-real-token" });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/token/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    create_user(&pool, "leaver", false).await;
    let tokens = obtain_tokens(&pool, "leaver", TEST_PASSWORD).await;
    let access = tokens["access_token"].as_str().unwrap();
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/logout",
        json!({}),
        access,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = json!({ "refresh_token": refresh_token });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/token/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_bearer_header_is_401(pool: PgPool) {
    let response = get_auth(common::build_test_app(pool), "/api/v1/cart", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
