//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get},
};
use common::session::SessionIdentity;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    ai_config::AiClientConfig,
    error::{ApiError, ApiResult},
    middleware::{redirect_middleware, require_admin},
    models::{AiSettingsResponse, redirect::NewRedirect},
    state::AppState,
    validation::{validate_destination, validate_source_path},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/admin/me", get(current_user))
        .route("/admin/redirects", get(list_redirects).post(create_redirect))
        .route("/admin/redirects/:id", delete(delete_redirect))
        .route("/admin/settings/ai", get(ai_settings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(admin_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            redirect_middleware,
        ))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Identity behind the current admin session
pub async fn current_user(Extension(identity): Extension<SessionIdentity>) -> impl IntoResponse {
    Json(identity)
}

/// List all redirect rules
pub async fn list_redirects(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let rules = state.redirects.list().await.map_err(|e| {
        error!("Failed to list redirects: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(rules))
}

/// Create a redirect rule
pub async fn create_redirect(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    payload: Result<Json<NewRedirect>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(mut payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    payload.source_path = payload.source_path.trim().to_string();
    payload.destination_path = payload.destination_path.trim().to_string();

    validate_source_path(&payload.source_path).map_err(ApiError::BadRequest)?;
    validate_destination(&payload.destination_path).map_err(ApiError::BadRequest)?;

    if payload.source_path == payload.destination_path {
        return Err(ApiError::BadRequest(
            "Source and destination must differ".to_string(),
        ));
    }

    let rule = state
        .redirects
        .create(&payload)
        .await
        .map_err(|e| {
            error!("Failed to create redirect: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| {
            ApiError::Conflict(format!(
                "A redirect for {} already exists",
                payload.source_path
            ))
        })?;

    info!(
        "Redirect {} -> {} ({}) created by {}",
        rule.source_path, rule.destination_path, rule.redirect_type, identity.email
    );

    Ok((StatusCode::CREATED, Json(rule)))
}

/// Delete a redirect rule by ID
pub async fn delete_redirect(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.redirects.delete(id).await.map_err(|e| {
        error!("Failed to delete redirect {}: {}", id, e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Redirect not found".to_string()));
    }

    info!("Redirect {} deleted by {}", id, identity.email);
    Ok(StatusCode::NO_CONTENT)
}

/// Whether article generation has credentials, and which endpoint it targets
pub async fn ai_settings(State(state): State<AppState>) -> impl IntoResponse {
    let config = AiClientConfig::resolve(&state.settings).await;

    Json(AiSettingsResponse {
        configured: config.is_configured(),
        model: config.model,
        base_url: config.base_url,
    })
}
