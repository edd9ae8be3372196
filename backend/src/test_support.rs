//! Fixtures for driving the router in-process.
//!
//! A [`TestSession`] owns an in-memory store and a stub identity provider
//! wired into a fresh router. Each test builds its own session, so nothing
//! leaks between tests.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use tower::ServiceExt;

use crate::auth::{AuthConfig, Principal, StubIdentity};
use crate::store::MemoryStore;
use crate::{create_app, AppState};

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-key-for-testing-only".to_string(),
        token_duration_days: 7,
        cookie_name: "session_token".to_string(),
        github_client_id: "test-client".to_string(),
        github_client_secret: "test-secret".to_string(),
        github_callback_url: "http://localhost:8080/auth/github/callback".to_string(),
    }
}

pub struct TestSession {
    pub store: Arc<MemoryStore>,
    identity: Arc<StubIdentity>,
    app: Router,
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSession {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(StubIdentity::new());
        let state = AppState::new(store.clone(), identity.clone(), test_auth_config());

        Self {
            store,
            identity,
            app: create_app(state),
        }
    }

    /// Treat every following request as coming from `principal`.
    pub fn login(&self, principal: Principal) {
        self.identity.login(principal);
    }

    pub fn logout(&self) {
        self.identity.logout();
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        match self.app.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).expect("valid request"))
            .await
    }

    /// POST an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, json: serde_json::Value) -> Response<Body> {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("valid request");
        self.send(request).await
    }
}

/// Collect a response body into a UTF-8 string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Value of the `Location` header, empty when absent.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
