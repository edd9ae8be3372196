//! Schedule poll backend: create schedules with candidate dates, collect
//! availability answers and render the aggregated grid.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod grid;
mod handlers;
mod models;
mod routes;
mod schema;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod views;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, IdentityProvider};
use crate::store::Store;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub auth_config: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        identity: Arc<dyn IdentityProvider>,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            store,
            identity,
            auth_config: Arc::new(auth_config),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    routes::app_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
