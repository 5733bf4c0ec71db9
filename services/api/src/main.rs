use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod ai_config;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    session::{SessionConfig, SessionTokenService},
    settings::SettingsResolver,
};

use crate::{ai_config::AiClientConfig, repositories::RedirectRepository, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    health_check(&pool).await?;

    let sessions = SessionTokenService::new(SessionConfig::from_env()?)?;
    let settings = SettingsResolver::standard(pool.clone(), AiClientConfig::defaults())?;

    let app_state = AppState {
        redirects: Arc::new(RedirectRepository::new(pool)),
        sessions,
        settings,
    };

    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let addr = std::env::var("API_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
