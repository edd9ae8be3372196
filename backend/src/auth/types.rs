use serde::{Deserialize, Serialize};

/// Payload of a session token.
///
/// `sub` carries the GitHub user id as a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// The logged-in user as seen by handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
}

/// Session and OAuth settings, split out of [`crate::config::AppConfig`].
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_duration_days: i64,
    pub cookie_name: String,
    pub github_client_id: String,
    pub github_client_secret: String,
    pub github_callback_url: String,
}
