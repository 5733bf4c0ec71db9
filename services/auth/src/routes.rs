//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::{debug, error, info};

use crate::{
    AppState,
    error::AuthError,
    models::{LoginRequest, LoginResponse, SessionResponse, UserSummary},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/session", post(validate_session))
        .route("/auth/logout", post(logout))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User login endpoint
///
/// On success the session cookie is set and the public user view returned.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    let Json(payload) = payload.map_err(|e| {
        debug!("Rejected login body: {}", e.body_text());
        AuthError::Validation("Invalid request body".to_string())
    })?;

    let email = payload.email.as_deref().map(str::trim).unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(AuthError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    info!("Login attempt for user: {}", email);

    let user = state.verifier.verify(email, password).await?;
    let identity = user.identity();

    let token = state.sessions.issue(&identity).map_err(|e| {
        error!("Failed to issue session token: {}", e);
        AuthError::Internal
    })?;

    info!("User {} logged in", identity.id);

    let jar = state.sessions.attach(jar, token);
    Ok((
        jar,
        Json(LoginResponse {
            user: UserSummary::from(identity),
        }),
    ))
}

/// Session validation endpoint
///
/// Any problem with the cookie is reported as `valid: false`.
pub async fn validate_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<SessionResponse> {
    let user = state.sessions.identify(&jar).map(UserSummary::from);

    Json(SessionResponse {
        valid: user.is_some(),
        user,
    })
}

/// Logout endpoint
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    info!("Logout request");

    (
        state.sessions.clear(jar),
        Json(json!({"message": "Logged out successfully"})),
    )
}
