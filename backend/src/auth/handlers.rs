//! Authentication HTTP handlers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use chrono::Duration;
use serde::Deserialize;
use shared::models::User;

use crate::error::ApiError;
use crate::store::UserStore;
use crate::AppState;

use super::identity::read_cookie;
use super::{build_auth_cookie, clear_auth_cookie, jwt, AuthConfig, MaybeUser, Principal};

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_URL: &str = "https://api.github.com/user";

const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_MINUTES: i64 = 10;

/// Login page with a link to start the GitHub flow.
pub async fn login_page(MaybeUser(principal): MaybeUser) -> Html<String> {
    Html(crate::views::login_page(principal.as_ref()))
}

/// Logout - clear session cookie and go home.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_auth_cookie(&state.auth_config.cookie_name);

    (
        StatusCode::FOUND,
        [(header::LOCATION, "/".to_string()), (header::SET_COOKIE, cookie)],
    )
}

/// Start GitHub OAuth login flow.
///
/// The random `state` sent to GitHub is also kept, signed, in a short-lived
/// cookie scoped to `/auth/github`; the callback must echo it back.
pub async fn github_login(State(state): State<AppState>) -> Response {
    let config = &state.auth_config;
    let csrf_state = uuid::Uuid::new_v4().to_string();

    let lifetime = Duration::minutes(OAUTH_STATE_MINUTES);
    let signed_state = match jwt::issue_oauth_state(config, &csrf_state, lifetime) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to sign OAuth state: {}", e);
            return ApiError::Internal(anyhow::anyhow!("Failed to start login")).into_response();
        }
    };

    let auth_url = format!(
        "{}?client_id={}&redirect_uri={}&scope={}&state={}",
        GITHUB_AUTHORIZE_URL,
        urlencoding::encode(&config.github_client_id),
        urlencoding::encode(&config.github_callback_url),
        urlencoding::encode("user:email"),
        csrf_state
    );

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, auth_url),
            (header::SET_COOKIE, oauth_state_cookie(&signed_state)),
        ],
    )
        .into_response()
}

fn oauth_state_cookie(value: &str) -> String {
    format!(
        "{}={}; Path=/auth/github; HttpOnly; SameSite=Lax; Max-Age={}",
        OAUTH_STATE_COOKIE,
        value,
        OAUTH_STATE_MINUTES * 60
    )
}

fn clear_oauth_state_cookie() -> String {
    format!(
        "{}=; Path=/auth/github; HttpOnly; SameSite=Lax; Max-Age=0",
        OAUTH_STATE_COOKIE
    )
}

/// Check the callback's `state` against the signed cookie set by [`github_login`].
fn verify_oauth_state(
    config: &AuthConfig,
    headers: &HeaderMap,
    returned: Option<&str>,
) -> Result<(), &'static str> {
    let returned = returned.ok_or("callback carried no state")?;
    let cookie = read_cookie(headers, OAUTH_STATE_COOKIE).ok_or("state cookie missing")?;
    let expected =
        jwt::read_oauth_state(config, &cookie).map_err(|_| "state cookie invalid or expired")?;

    if expected == returned {
        Ok(())
    } else {
        Err("state does not match")
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthCallbackParams {
    pub code: String,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: i64,
    login: String,
}

/// Handle GitHub OAuth callback.
///
/// Exchanges the authorization code for a token, upserts the user and sets a
/// session cookie on success.
pub async fn github_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AuthCallbackParams>,
) -> Response {
    if let Err(reason) =
        verify_oauth_state(&state.auth_config, &headers, params.state.as_deref())
    {
        tracing::warn!("Rejected OAuth callback: {}", reason);
        return login_error_redirect("state_mismatch");
    }

    match handle_callback_inner(&state, params).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Auth callback error: {:?}", e);
            login_error_redirect("auth_failed")
        }
    }
}

fn login_error_redirect(reason: &str) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, format!("/login?auth_error={}", reason)),
            (header::SET_COOKIE, clear_oauth_state_cookie()),
        ],
    )
        .into_response()
}

async fn handle_callback_inner(
    state: &AppState,
    params: AuthCallbackParams,
) -> Result<Response, ApiError> {
    let config = &state.auth_config;
    let client = reqwest::Client::new();

    #[derive(serde::Serialize)]
    struct TokenRequest<'a> {
        client_id: &'a str,
        client_secret: &'a str,
        code: String,
        redirect_uri: &'a str,
    }

    let token_response = client
        .post(GITHUB_TOKEN_URL)
        .header(reqwest::header::ACCEPT, "application/json")
        .form(&TokenRequest {
            client_id: &config.github_client_id,
            client_secret: &config.github_client_secret,
            code: params.code,
            redirect_uri: &config.github_callback_url,
        })
        .send()
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Token exchange failed: {}", e)))?;

    if !token_response.status().is_success() {
        let status = token_response.status();
        let body = token_response.text().await.unwrap_or_default();
        tracing::error!("Token exchange failed: {} - {}", status, body);
        return Ok(login_error_redirect("token_exchange_failed"));
    }

    let tokens: GithubTokenResponse = token_response
        .json()
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid token response: {}", e)))?;

    let github_user: GithubUser = client
        .get(GITHUB_USER_URL)
        .bearer_auth(&tokens.access_token)
        .header(reqwest::header::USER_AGENT, "schedule-poll")
        .send()
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to get user info: {}", e)))?
        .json()
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid user info response: {}", e)))?;

    tracing::info!("OAuth login from GitHub user {}", github_user.login);

    state
        .store
        .upsert_user(&User {
            user_id: github_user.id,
            username: github_user.login.clone(),
        })
        .await?;

    let principal = Principal {
        id: github_user.id,
        username: github_user.login,
    };
    let token = jwt::issue_session_token(config, &principal)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to sign session: {}", e)))?;
    let cookie = build_auth_cookie(&config.cookie_name, &token, config.token_duration_days);

    tracing::info!("Successful login for user {}", principal.id);

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, "/")],
        AppendHeaders([
            (header::SET_COOKIE, cookie),
            (header::SET_COOKIE, clear_oauth_state_cookie()),
        ]),
    )
        .into_response())
}
