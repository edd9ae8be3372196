//! Identity providers and the extractors handlers use to read the principal.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use super::jwt;
use super::types::{AuthConfig, Principal};
use crate::AppState;

/// Source of the authenticated principal for a request.
///
/// Production uses [`JwtCookieIdentity`]; tests substitute a stub.
pub trait IdentityProvider: Send + Sync {
    fn current_principal(&self, headers: &HeaderMap) -> Option<Principal>;
}

/// Reads the principal from the signed session cookie.
pub struct JwtCookieIdentity {
    config: AuthConfig,
}

impl JwtCookieIdentity {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }
}

impl IdentityProvider for JwtCookieIdentity {
    fn current_principal(&self, headers: &HeaderMap) -> Option<Principal> {
        let token = read_cookie(headers, &self.config.cookie_name)?;
        match jwt::read_session_token(&self.config, &token) {
            Ok(principal) => Some(principal),
            Err(e) => {
                tracing::debug!("Ignoring session cookie: {}", e);
                None
            }
        }
    }
}

pub(crate) fn read_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    for cookie_str in cookie_header.split(';') {
        if let Ok(cookie) = cookie::Cookie::parse(cookie_str.trim()) {
            if cookie.name() == cookie_name {
                return Some(cookie.value().to_string());
            }
        }
    }

    None
}

/// Build a session cookie string.
pub fn build_auth_cookie(name: &str, value: &str, days: i64) -> String {
    let max_age = days * 24 * 60 * 60;
    let secure = if std::env::var("RUST_ENV").unwrap_or_default() == "production" {
        "; Secure"
    } else {
        ""
    };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        name, value, max_age, secure
    )
}

/// Cookie string that removes the session cookie.
pub fn clear_auth_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}

/// Principal if the request is authenticated.
pub struct MaybeUser(pub Option<Principal>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(state.identity.current_principal(&parts.headers)))
    }
}

/// Principal of an authenticated request; anonymous requests are sent to `/login`.
pub struct RequireUser(pub Principal);

/// Rejection for [`RequireUser`].
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        (StatusCode::FOUND, [(header::LOCATION, "/login")]).into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.identity.current_principal(&parts.headers) {
            Some(principal) => Ok(RequireUser(principal)),
            None => {
                tracing::warn!("Rejected anonymous request to {}", parts.uri.path());
                Err(LoginRedirect)
            }
        }
    }
}
