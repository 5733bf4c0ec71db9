//! Credential verification for back-office logins

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::Utc;
use common::session::ADMIN_ROLE;
use tracing::{error, warn};

use crate::{error::AuthError, models::User, repositories::UserStore};

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(hash)
}

/// Compare `password` with a stored PHC hash. Errors only if the hash is unreadable.
fn verify_hash(stored_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash checked when the account does not exist, so both paths cost the same
fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| hash_password("not-a-real-password").unwrap_or_default())
}

/// Run the argon2 comparison on the blocking pool. `None` checks the dummy hash.
async fn check_password(stored_hash: Option<String>, password: &str) -> Result<bool> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_hash(&hash, &password),
        None => verify_hash(dummy_hash(), &password),
    })
    .await?
}

/// Checks submitted credentials against stored users
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Verify an email/password pair and record the login.
    ///
    /// Unknown email and wrong password fail identically. Inactive and
    /// non-admin accounts are refused only after the password matched.
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let found = self.users.find_by_email(email).await.map_err(|e| {
            error!("Failed to look up user {}: {}", email, e);
            AuthError::Internal
        })?;

        let Some(user) = found else {
            let _ = check_password(None, password).await;
            warn!("Login rejected for {}: unknown account", email);
            return Err(AuthError::InvalidCredentials);
        };

        match check_password(Some(user.password_hash.clone()), password).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Login rejected for {}: wrong password", email);
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!("Password check failed for user {}: {}", user.id, e);
                return Err(AuthError::InvalidCredentials);
            }
        }

        if !user.is_active {
            warn!("Login rejected for {}: account disabled", email);
            return Err(AuthError::Forbidden);
        }

        if user.role != ADMIN_ROLE {
            warn!("Login rejected for {}: role {} is not allowed", email, user.role);
            return Err(AuthError::Forbidden);
        }

        let now = Utc::now();
        self.users.record_login(user.id, now).await.map_err(|e| {
            error!("Failed to record login for user {}: {}", user.id, e);
            AuthError::Internal
        })?;

        Ok(User {
            last_login_at: Some(now),
            ..user
        })
    }
}
