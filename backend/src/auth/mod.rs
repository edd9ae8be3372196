//! Authentication module: GitHub OAuth login with JWT session cookies.
//!
//! This module provides:
//! - The [`IdentityProvider`] seam handlers read the principal through
//! - JWT session token creation and validation
//! - GitHub OAuth flow for user login
//! - `MaybeUser` / `RequireUser` extractors

mod handlers;
mod identity;
mod jwt;
#[cfg(any(test, feature = "test-support"))]
mod stub;
pub mod types;

pub use handlers::{github_callback, github_login, login_page, logout};
pub use identity::{
    build_auth_cookie, clear_auth_cookie, IdentityProvider, JwtCookieIdentity, MaybeUser,
    RequireUser,
};
#[cfg(any(test, feature = "test-support"))]
pub use stub::StubIdentity;
pub use types::{AuthConfig, Principal};
