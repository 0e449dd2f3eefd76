#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use server::state::AppState;
use service::auth::{AdminAuthService, AdminCredentials, SessionSigner};
use service::keys::KeyService;
use service::keystore::{MemoryKeyStore, DEFAULT_KEYS};
use tower::ServiceExt;

pub const ADMIN_USER: &str = "duong2024";
pub const ADMIN_PASS: &str = "duongpizza";

pub fn test_state(legacy_endpoints: bool) -> AppState {
    let credentials = AdminCredentials::from_entries([(ADMIN_USER, ADMIN_PASS)]).expect("credentials");
    let signer = SessionSigner::new("test-secret", Duration::from_secs(3600)).expect("signer");
    AppState {
        keys: KeyService::new(Arc::new(MemoryKeyStore::with_keys(DEFAULT_KEYS))),
        auth: Arc::new(AdminAuthService::new(credentials, signer)),
        secure_cookie: false,
        legacy_endpoints,
    }
}

pub fn app(legacy_endpoints: bool) -> Router {
    server::startup::build_app(test_state(legacy_endpoints))
}

pub async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.expect("infallible router")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

pub fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut b = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        b = b.header(header::COOKIE, c);
    }
    b.body(Body::from(body.to_string())).expect("request")
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

pub async fn body_text(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn location(resp: &Response) -> Option<&str> {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

/// `admin_session=<token>` pair from a Set-Cookie header, if any.
pub fn session_cookie(resp: &Response) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("admin_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Log in and return the cookie pair to send on later requests.
pub async fn login(app: &Router) -> String {
    let body = format!("username={ADMIN_USER}&password={ADMIN_PASS}");
    let resp = send(app, form_post("/admin/login", &body, None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    session_cookie(&resp).expect("session cookie on successful login")
}
