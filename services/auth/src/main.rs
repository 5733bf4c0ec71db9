use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod credentials;
mod error;
mod models;
mod repositories;
mod routes;

use common::{
    database::{self, DatabaseConfig},
    session::{SessionConfig, SessionTokenService},
};

use crate::{credentials::CredentialVerifier, repositories::UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub verifier: CredentialVerifier,
    pub sessions: SessionTokenService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // `auth hash-password` reads a password on stdin and prints its hash,
    // for seeding accounts in the users table.
    if std::env::args().nth(1).as_deref() == Some("hash-password") {
        let mut password = String::new();
        std::io::stdin().read_line(&mut password)?;
        println!("{}", credentials::hash_password(password.trim_end_matches(['\r', '\n']))?);
        return Ok(());
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    database::health_check(&pool).await?;

    if let Some(dir) = &db_config.migrations_dir {
        database::run_migrations(&pool, dir).await?;
    }

    let session_config = SessionConfig::from_env()?;
    let sessions = SessionTokenService::new(session_config)?;
    info!("Session tokens expire after {}s", sessions.ttl_seconds());

    let users = Arc::new(UserRepository::new(pool));
    let app_state = AppState {
        verifier: CredentialVerifier::new(users),
        sessions,
    };

    info!("Authentication service initialized successfully");

    let app = routes::create_router(app_state);

    let addr = std::env::var("AUTH_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Authentication service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
