//! API models for request and response payloads

use serde::Serialize;

pub mod redirect;

/// Response for the AI settings status endpoint. Never carries the key.
#[derive(Debug, Serialize)]
pub struct AiSettingsResponse {
    pub configured: bool,
    pub model: String,
    pub base_url: String,
}
