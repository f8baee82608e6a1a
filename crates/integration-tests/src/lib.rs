//! Integration tests for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` / `wishlist_properties` - Reconciliation rules driven
//!   through long operation sequences
//! - `router` - The full storefront router, exercised with
//!   `tower::ServiceExt::oneshot`, on paths decided before the database is
//!   touched (authentication, authorization, input validation). The pool is
//!   created lazily and never connects.
//! - `storefront_db` - Services and router over real SQL. Each test gets a
//!   fresh database from `#[sqlx::test]`, migrated from
//!   `crates/storefront/migrations`, so `DATABASE_URL` must point at a
//!   `PostgreSQL` server the tests may create databases on.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::{IpAddr, Ipv4Addr};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use bazaar_core::{Role, UserId};
use bazaar_storefront::config::{CloudinaryConfig, JwtConfig, LogFormat, StorefrontConfig};
use bazaar_storefront::services::auth::Claims;
use bazaar_storefront::state::AppState;
use http_body_util::BodyExt;
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Signing secret used by every test token.
pub const TEST_JWT_SECRET: &str = "k9Vq2mZr7TfXw4LpB8sHn3JcY6dGa1Ue";

/// Configuration that never reaches a real service.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://bazaar@127.0.0.1:1/bazaar_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        client_base_url: "http://localhost:5173".parse().unwrap(),
        jwt: JwtConfig {
            secret: SecretString::from(TEST_JWT_SECRET),
            ttl_minutes: 60,
        },
        cloudinary: CloudinaryConfig {
            cloud_name: "bazaar-test".to_string(),
            api_key: "1234".to_string(),
            api_secret: SecretString::from("cloudinary-test"),
            folder: "ecommerce".to_string(),
        },
        log_format: LogFormat::Pretty,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Application state backed by a pool that connects on first use.
#[must_use]
pub fn test_state() -> AppState {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgres://bazaar@127.0.0.1:1/bazaar_test")
        .expect("lazy pool");
    AppState::new(config, pool)
}

/// The storefront router over [`test_state`].
#[must_use]
pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    (bazaar_storefront::app(state.clone()), state)
}

/// The storefront router over a live pool.
#[must_use]
pub fn app_with_pool(pool: PgPool) -> (Router, AppState) {
    let state = AppState::new(test_config(), pool);
    (bazaar_storefront::app(state.clone()), state)
}

/// Insert a shopper directly, bypassing bcrypt. Returns the new user id.
pub async fn insert_user(pool: &PgPool, user_name: &str) -> i32 {
    sqlx::query_scalar(
        r"
        INSERT INTO shop.user (user_name, email, password_hash)
        VALUES ($1, $2, 'x')
        RETURNING id
        ",
    )
    .bind(user_name)
    .bind(format!("{user_name}@example.com"))
    .fetch_one(pool)
    .await
    .expect("insert user")
}

/// Insert a product with the given stock. Returns the new product id.
pub async fn insert_product(pool: &PgPool, title: &str, total_stock: i32) -> i32 {
    sqlx::query_scalar(
        r"
        INSERT INTO shop.product (title, category, brand, price, total_stock)
        VALUES ($1, 'kitchen', 'northwind', 12.50, $2)
        RETURNING id
        ",
    )
    .bind(title)
    .bind(total_stock)
    .fetch_one(pool)
    .await
    .expect("insert product")
}

/// Mint a bearer token for a user with the given role.
#[must_use]
pub fn token_for(state: &AppState, id: i32, role: Role) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        id: UserId::new(id),
        role,
        email: format!("user{id}@example.com"),
        user_name: format!("user{id}"),
        iat: now,
        exp: now + 3600,
    };
    state.tokens().sign(&claims).expect("sign test token")
}

/// A JSON request with an optional bearer token.
#[must_use]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "203.0.113.7");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// A body-less request with an optional bearer token.
#[must_use]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.7");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
