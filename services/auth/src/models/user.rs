//! User model and login payloads

use chrono::{DateTime, Utc};
use common::session::SessionIdentity;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Identity embedded in the session token
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role.clone(),
        }
    }
}

/// Request for user login
///
/// Both fields are optional at the wire level so a missing field is reported
/// as a validation error instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public view of a signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
}

impl From<SessionIdentity> for UserSummary {
    fn from(identity: SessionIdentity) -> Self {
        UserSummary {
            id: identity.id,
            email: identity.email,
            full_name: identity.full_name,
            role: identity.role,
        }
    }
}

/// Response for user login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserSummary,
}

/// Response for session validation
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}
