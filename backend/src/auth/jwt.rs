//! Signed session tokens stored in the session cookie.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::types::{AuthConfig, Claims, Principal};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),
    #[error("token subject {0:?} is not a user id")]
    BadSubject(String),
}

impl Claims {
    fn for_principal(principal: &Principal, lifetime: Duration) -> Self {
        let issued = Utc::now();
        Self {
            sub: principal.id.to_string(),
            username: principal.username.clone(),
            iat: issued.timestamp(),
            exp: (issued + lifetime).timestamp(),
        }
    }

    fn into_principal(self) -> Result<Principal, TokenError> {
        let id = self
            .sub
            .parse()
            .map_err(|_| TokenError::BadSubject(self.sub.clone()))?;
        Ok(Principal {
            id,
            username: self.username,
        })
    }
}

/// Sign a session token for `principal`, valid for the configured number of days.
pub fn issue_session_token(
    config: &AuthConfig,
    principal: &Principal,
) -> Result<String, TokenError> {
    let claims = Claims::for_principal(principal, Duration::days(config.token_duration_days));
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify signature and expiry, then recover the principal.
pub fn read_session_token(
    config: &AuthConfig,
    token: &str,
) -> Result<Principal, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    data.claims.into_principal()
}

#[derive(Debug, Serialize, Deserialize)]
struct OAuthStateClaims {
    state: String,
    exp: i64,
}

/// Sign the OAuth `state` value so the callback can check it came from us.
pub fn issue_oauth_state(
    config: &AuthConfig,
    state: &str,
    lifetime: Duration,
) -> Result<String, TokenError> {
    let claims = OAuthStateClaims {
        state: state.to_string(),
        exp: (Utc::now() + lifetime).timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Recover the `state` value from a token made by [`issue_oauth_state`].
pub fn read_oauth_state(config: &AuthConfig, token: &str) -> Result<String, TokenError> {
    let data = decode::<OAuthStateClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims.state)
}
