//! Shared helpers for integration tests.
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use portalgate::{
    DEFAULT_LOGIN_PATH, ServerConfig, auth::ProtectedPaths, create_app, db::Database,
    jwt::JwtConfig,
};

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-with-enough-length";

pub async fn create_test_app() -> (Router, Database) {
    create_test_app_with(ProtectedPaths::defaults()).await
}

pub async fn create_test_app_with(protected_paths: ProtectedPaths) -> (Router, Database) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: TEST_SECRET.to_vec(),
        protected_paths,
        login_path: DEFAULT_LOGIN_PATH.to_string(),
    };
    (create_app(&config), db)
}

pub fn create_jwt() -> JwtConfig {
    JwtConfig::new(TEST_SECRET)
}

pub fn session_token(account_id: Option<&str>, email: Option<&str>) -> String {
    create_jwt()
        .generate_session_token(account_id, email, 3600)
        .unwrap()
        .token
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("cookie", format!("session_token={}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn put_json(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("cookie", format!("session_token={}", token))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .expect("missing location header")
        .to_str()
        .unwrap()
}
