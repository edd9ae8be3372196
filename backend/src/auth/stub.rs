//! Identity provider double whose principal is set directly by tests.

use std::sync::RwLock;

use axum::http::HeaderMap;

use super::identity::IdentityProvider;
use super::types::Principal;

/// Every request is treated as coming from the logged-in principal, if any.
#[derive(Debug, Default)]
pub struct StubIdentity {
    principal: RwLock<Option<Principal>>,
}

impl StubIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, principal: Principal) {
        if let Ok(mut current) = self.principal.write() {
            *current = Some(principal);
        }
    }

    pub fn logout(&self) {
        if let Ok(mut current) = self.principal.write() {
            *current = None;
        }
    }
}

impl IdentityProvider for StubIdentity {
    fn current_principal(&self, _headers: &HeaderMap) -> Option<Principal> {
        self.principal.read().ok().and_then(|p| p.clone())
    }
}
