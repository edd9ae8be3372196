use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backend::auth::JwtCookieIdentity;
use backend::config::AppConfig;
use backend::db::establish_connection_pool;
use backend::store::PgStore;
use backend::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = AppConfig::from_env()?;

    tracing::info!("Starting schedule poll server");

    // Initialize database pool
    let pool = establish_connection_pool(&config.database_url)?;
    tracing::info!("Database connection pool initialized");

    let auth_config = config.auth();
    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(JwtCookieIdentity::new(auth_config.clone())),
        auth_config,
    );
    let app = create_app(state);

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
