#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

use conference_api::auth::jwt::{generate_access_token, JwtConfig};
use conference_api::config::ServerConfig;
use conference_api::router::build_app_router;
use conference_api::state::AppState;
use conference_events::{Cache, TaskQueue, TaskWorker};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8080".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        announcement_refresh_secs: 3600,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audiences: Vec::new(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over `pool`, with a task worker
/// draining the queue in the background.
///
/// The worker stops once the returned router is dropped.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let cache = Arc::new(Cache::new());
    let (tasks, receiver) = TaskQueue::new();

    let worker = TaskWorker::new(pool.clone(), Arc::clone(&cache), None)
        .with_retry_delay(Duration::from_millis(10));
    tokio::spawn(worker.run(receiver));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cache,
        tasks,
    };

    build_app_router(state, &config)
}

/// App whose pool never connects. For requests that are rejected before
/// touching the database.
pub fn build_lazy_app() -> Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://localhost:1/unused")
        .expect("lazy pool");
    build_test_app(pool)
}

/// Bearer token for `user_id` signed with the test secret.
pub fn token_for(user_id: &str) -> String {
    generate_access_token(
        user_id,
        &format!("{user_id}@example.com"),
        None,
        &test_config().jwt,
    )
    .expect("token generation should succeed")
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
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
