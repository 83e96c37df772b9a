//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the application through [`build_app_router`] so tests exercise the
//! same middleware stack production uses, with the HTTP storage client
//! replaced by a recording fake.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use shopkit_api::auth::jwt::{generate_token, JwtConfig};
use shopkit_api::auth::password::hash_password;
use shopkit_api::config::ServerConfig;
use shopkit_api::router::build_app_router;
use shopkit_api::state::AppState;
use shopkit_api::storage::{ObjectStorage, StorageConfig, StorageError};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_hours: 1,
        },
        storage: StorageConfig {
            url: "http://storage.test".to_string(),
            service_key: "test-key".to_string(),
        },
    }
}

/// Records every delete batch instead of talking to a storage service.
#[derive(Default)]
pub struct RecordingStorage {
    pub deleted: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingStorage {
    pub fn batches(&self) -> Vec<(String, Vec<String>)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ObjectStorage for RecordingStorage {
    async fn delete_objects(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        self.deleted
            .lock()
            .unwrap()
            .push((bucket.to_string(), paths.to_vec()));
        Ok(())
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and storage fake.
pub fn build_test_app(pool: PgPool, storage: Arc<dyn ObjectStorage>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
    };
    build_app_router(state, &config)
}

/// Build the app with a throwaway recording storage, for tests that do not
/// assert on blob deletion.
pub fn build_app(pool: PgPool) -> Router {
    build_test_app(pool, Arc::new(RecordingStorage::default()))
}

/// Insert an admin profile row and return `(profile_id, bearer_token)`.
pub async fn seed_admin(pool: &PgPool) -> (i64, String) {
    let hash = hash_password("admin_password_123!").expect("hashing should succeed");
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO profiles (username, password_hash, role)
         VALUES ('admin', $1, 'admin') RETURNING id",
    )
    .bind(&hash)
    .fetch_one(pool)
    .await
    .expect("profile insert should succeed");

    let token = generate_token(id, "admin", &test_config().jwt).expect("token generation");
    (id, token)
}

/// A bearer token carrying a non-admin role, for RBAC rejection tests.
pub fn staff_token(profile_id: i64) -> String {
    generate_token(profile_id, "staff", &test_config().jwt).expect("token generation")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn request_json(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    request_json(app, "POST", uri, None, body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request_json(app, "POST", uri, Some(token), body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request_json(app, "PUT", uri, Some(token), body).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request_json(app, "PATCH", uri, Some(token), body).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Assert status and return the parsed body.
pub async fn expect_status(
    response: Response<Body>,
    status: StatusCode,
) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
