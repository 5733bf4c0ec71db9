//! Connection settings for the article-generation model API
//!
//! Resolved from [`SettingsResolver`] on each use, so a key saved in the
//! back-office takes effect without a restart.

use std::fmt;

use common::settings::{SettingsResolver, StaticSettings};

pub const API_KEY: &str = "openai_api_key";
pub const MODEL: &str = "openai_model";
pub const BASE_URL: &str = "openai_base_url";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone)]
pub struct AiClientConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl AiClientConfig {
    /// Built-in defaults, the lowest-precedence settings layer
    pub fn defaults() -> StaticSettings {
        StaticSettings::new([(MODEL, DEFAULT_MODEL), (BASE_URL, DEFAULT_BASE_URL)])
    }

    pub async fn resolve(settings: &SettingsResolver) -> Self {
        AiClientConfig {
            api_key: settings.resolve(API_KEY).await,
            model: settings.resolve_or(MODEL, DEFAULT_MODEL).await,
            base_url: settings
                .resolve_or(BASE_URL, DEFAULT_BASE_URL)
                .await
                .trim_end_matches('/')
                .to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for AiClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}
