//! Application state shared across handlers

use std::sync::Arc;

use common::{session::SessionTokenService, settings::SettingsResolver};

use crate::repositories::RedirectStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub redirects: Arc<dyn RedirectStore>,
    pub sessions: SessionTokenService,
    pub settings: SettingsResolver,
}
