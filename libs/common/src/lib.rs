//! Shared building blocks for the site services
//!
//! Database connectivity, error types, layered settings and session tokens
//! used by both the auth and the API service.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     health_check(&pool).await?;
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod session;
pub mod settings;
