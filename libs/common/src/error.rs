//! Error types shared by the services

use sqlx::{Error as SqlxError, migrate::MigrateError};
use thiserror::Error;

/// Failures talking to PostgreSQL
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A statement reached the database and failed
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),

    #[error("Database configuration error: {0}")]
    Configuration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Failures building the session service or minting a token.
///
/// Rejections of presented tokens are [`crate::session::TokenRejection`].
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session configuration error: {0}")]
    Configuration(String),

    #[error("System clock is before the Unix epoch")]
    Clock,

    #[error("Session expiry overflows the clock")]
    ExpiryOverflow,

    #[error("Failed to sign session token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
