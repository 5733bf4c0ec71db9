//! Redirect rule models

use std::{fmt, str::FromStr};

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a redirect is permanent (301) or temporary (302)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectType {
    #[default]
    Permanent,
    Temporary,
}

impl RedirectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectType::Permanent => "permanent",
            RedirectType::Temporary => "temporary",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RedirectType::Permanent => StatusCode::MOVED_PERMANENTLY,
            RedirectType::Temporary => StatusCode::FOUND,
        }
    }
}

impl fmt::Display for RedirectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedirectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permanent" => Ok(RedirectType::Permanent),
            "temporary" => Ok(RedirectType::Temporary),
            other => Err(format!("Unknown redirect type: {}", other)),
        }
    }
}

/// Stored redirect rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectRule {
    pub id: Uuid,
    pub source_path: String,
    pub destination_path: String,
    #[serde(rename = "type")]
    pub redirect_type: RedirectType,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a redirect rule
#[derive(Debug, Clone, Deserialize)]
pub struct NewRedirect {
    pub source_path: String,
    pub destination_path: String,
    #[serde(rename = "type", default)]
    pub redirect_type: RedirectType,
}
