//! Request middleware: path redirects and the admin session guard

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header::LOCATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use crate::{error::ApiError, models::redirect::RedirectRule, state::AppState};

/// Path prefixes that never go through redirect lookup
const EXCLUDED_PREFIXES: &[&str] = &["/api", "/admin", "/_next", "/static", "/assets"];

/// Whether `path` bypasses redirect lookup: API, admin and asset paths,
/// and any path whose last segment looks like a file name.
pub fn is_excluded_path(path: &str) -> bool {
    if path == "/favicon.ico" {
        return true;
    }

    let under_prefix = EXCLUDED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    });
    if under_prefix {
        return true;
    }

    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}

fn redirect_response(rule: &RedirectRule) -> Option<Response> {
    match HeaderValue::from_str(&rule.destination_path) {
        Ok(location) => {
            Some((rule.redirect_type.status(), [(LOCATION, location)]).into_response())
        }
        Err(e) => {
            warn!(
                "Redirect {} has an unusable destination {:?}: {}",
                rule.source_path, rule.destination_path, e
            );
            None
        }
    }
}

/// Answer requests for a known old path with a redirect.
///
/// A miss or a failed lookup lets the request through untouched.
pub async fn redirect_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if is_excluded_path(&path) {
        return next.run(req).await;
    }

    match state.redirects.find_by_source(&path).await {
        Ok(Some(rule)) => {
            if let Some(response) = redirect_response(&rule) {
                info!(
                    "Redirecting {} to {} ({})",
                    path, rule.destination_path, rule.redirect_type
                );
                return response;
            }
        }
        Ok(None) => {}
        Err(e) => warn!("Redirect lookup failed for {}: {}", path, e),
    }

    next.run(req).await
}

/// Require an admin session; the identity is stored in request extensions
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = state
        .sessions
        .identify(&jar)
        .ok_or(ApiError::Unauthorized)?;

    if !identity.is_admin() {
        warn!(
            "User {} with role {} denied access to {}",
            identity.id,
            identity.role,
            req.uri().path()
        );
        return Err(ApiError::Forbidden);
    }

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
