//! Session tokens: issuance, validation and the session cookie
//!
//! A session is an HS256 JWT carried in an HTTP-only cookie. Tokens are
//! immutable and stateless: there is no refresh, rotation or server-side
//! revocation. A token stays valid until its `exp` passes or the browser
//! drops the cookie.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};

/// Role tag granting access to the back-office
pub const ADMIN_ROLE: &str = "admin";

/// Longest accepted token lifetime (30 days)
pub const MAX_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC secret used to sign and verify tokens
    pub secret: String,
    /// Token lifetime in seconds (default: 24 hours)
    pub ttl_seconds: u64,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Whether the cookie carries the `Secure` attribute
    pub secure_cookie: bool,
}

impl SessionConfig {
    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_SECRET`: Signing secret (required, non-empty)
    /// - `SESSION_TTL_SECONDS`: Token lifetime in seconds, 1 to 30 days worth (default: 86400)
    /// - `SESSION_COOKIE_NAME`: Cookie name (default: "admin_session")
    /// - `SESSION_COOKIE_SECURE`: "false" disables the Secure flag for local HTTP (default: true)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable not set"))?;

        let ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .unwrap_or(86400);

        let cookie_name = std::env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "admin_session".to_string());

        let secure_cookie = std::env::var("SESSION_COOKIE_SECURE")
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Ok(SessionConfig {
            secret,
            ttl_seconds,
            cookie_name,
            secure_cookie,
        })
    }
}

/// Identity carried by a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
}

impl SessionIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub email: String,
    /// Full name, when the user has one
    pub name: Option<String>,
    pub role: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

impl From<Claims> for SessionIdentity {
    fn from(claims: Claims) -> Self {
        SessionIdentity {
            id: claims.sub,
            email: claims.email,
            full_name: claims.name,
            role: claims.role,
        }
    }
}

/// Reason a presented session was not accepted
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("no session cookie")]
    Missing,
    #[error("session token expired")]
    Expired,
    #[error("session token signature mismatch")]
    BadSignature,
    #[error("malformed session token")]
    Malformed,
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: SessionConfig,
}

impl SessionTokenService {
    pub fn new(config: SessionConfig) -> SessionResult<Self> {
        if config.secret.is_empty() {
            return Err(SessionError::Configuration(
                "Session secret must not be empty".to_string(),
            ));
        }

        if config.ttl_seconds == 0 || config.ttl_seconds > MAX_TTL_SECONDS {
            return Err(SessionError::Configuration(format!(
                "Session TTL must be between 1 and {} seconds, got {}",
                MAX_TTL_SECONDS, config.ttl_seconds
            )));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(SessionTokenService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Mint a token for a verified identity
    pub fn issue(&self, identity: &SessionIdentity) -> SessionResult<String> {
        let now = now_secs()?;
        let exp = now
            .checked_add(self.config.ttl_seconds)
            .ok_or(SessionError::ExpiryOverflow)?;

        self.sign(identity, now, exp)
    }

    fn sign(&self, identity: &SessionIdentity, iat: u64, exp: u64) -> SessionResult<String> {
        let claims = Claims {
            sub: identity.id,
            email: identity.email.clone(),
            name: identity.full_name.clone(),
            role: identity.role.clone(),
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify signature and expiry, returning the embedded identity
    pub fn validate(&self, token: &str) -> Result<SessionIdentity, TokenRejection> {
        if token.is_empty() {
            return Err(TokenRejection::Missing);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenRejection::Expired,
                ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                _ => TokenRejection::Malformed,
            }
        })?;

        Ok(data.claims.into())
    }

    /// Resolve the identity behind the session cookie, if any.
    ///
    /// Never fails: every rejection is logged and reported as `None`.
    pub fn identify(&self, jar: &CookieJar) -> Option<SessionIdentity> {
        let token = jar
            .get(&self.config.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .unwrap_or_default();

        match self.validate(&token) {
            Ok(identity) => Some(identity),
            Err(reason) => {
                debug!("Session rejected: {}", reason);
                None
            }
        }
    }

    /// Add the session cookie carrying `token` to the jar
    pub fn attach(&self, jar: CookieJar, token: String) -> CookieJar {
        let cookie = Cookie::build((self.config.cookie_name.clone(), token))
            .http_only(true)
            .secure(self.config.secure_cookie)
            .same_site(SameSite::Strict)
            .path("/");

        jar.add(cookie)
    }

    /// Expire the session cookie
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build((self.config.cookie_name.clone(), "")).path("/"))
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.config.ttl_seconds
    }
}

fn now_secs() -> SessionResult<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| SessionError::Clock)?
        .as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service_with_secret(secret: &str) -> SessionTokenService {
        SessionTokenService::new(SessionConfig {
            secret: secret.to_string(),
            ttl_seconds: 3600,
            cookie_name: "admin_session".to_string(),
            secure_cookie: true,
        })
        .unwrap()
    }

    fn identity(role: &str) -> SessionIdentity {
        SessionIdentity {
            id: Uuid::new_v4(),
            email: "ops@example.net".to_string(),
            full_name: Some("Ops Team".to_string()),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_issue_then_validate_returns_identity() {
        let service = service_with_secret("s3cret");
        let admin = identity(ADMIN_ROLE);

        let token = service.issue(&admin).unwrap();
        let validated = service.validate(&token).unwrap();

        assert_eq!(validated, admin);
        assert!(validated.is_admin());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = service_with_secret("s3cret");
        let now = now_secs().unwrap();

        let token = service
            .sign(&identity(ADMIN_ROLE), now - 7200, now - 1)
            .unwrap();

        assert_eq!(service.validate(&token), Err(TokenRejection::Expired));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = service_with_secret("first-secret");
        let verifier = service_with_secret("second-secret");

        let token = issuer.issue(&identity(ADMIN_ROLE)).unwrap();

        assert_eq!(verifier.validate(&token), Err(TokenRejection::BadSignature));
    }

    #[test]
    fn test_swapped_payload_is_rejected() {
        let service = service_with_secret("s3cret");
        let editor_token = service.issue(&identity("editor")).unwrap();
        let admin_token = service.issue(&identity(ADMIN_ROLE)).unwrap();

        // Admin claims with the editor's signature.
        let editor_parts: Vec<&str> = editor_token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", admin_parts[0], admin_parts[1], editor_parts[2]);

        assert_eq!(service.validate(&forged), Err(TokenRejection::BadSignature));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let service = service_with_secret("s3cret");

        assert_eq!(service.validate("not-a-jwt"), Err(TokenRejection::Malformed));
        assert_eq!(service.validate(""), Err(TokenRejection::Missing));
    }

    #[test]
    fn test_identify_reads_cookie() {
        let service = service_with_secret("s3cret");
        let admin = identity(ADMIN_ROLE);
        let token = service.issue(&admin).unwrap();

        let jar = CookieJar::new().add(Cookie::new("admin_session", token));
        assert_eq!(service.identify(&jar), Some(admin));

        assert_eq!(service.identify(&CookieJar::new()), None);

        let jar = CookieJar::new().add(Cookie::new("admin_session", "tampered"));
        assert_eq!(service.identify(&jar), None);
    }

    #[test]
    fn test_attach_sets_restrictive_cookie() {
        let service = service_with_secret("s3cret");

        let jar = service.attach(CookieJar::new(), "token-value".to_string());
        let cookie = jar.get("admin_session").unwrap();

        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_empty_secret_is_refused() {
        let result = SessionTokenService::new(SessionConfig {
            secret: String::new(),
            ttl_seconds: 60,
            cookie_name: "admin_session".to_string(),
            secure_cookie: true,
        });

        assert!(matches!(result, Err(SessionError::Configuration(_))));
    }

    #[test]
    fn test_ttl_outside_bounds_is_refused() {
        for ttl_seconds in [0, MAX_TTL_SECONDS + 1, u64::MAX] {
            let result = SessionTokenService::new(SessionConfig {
                secret: "s3cret".to_string(),
                ttl_seconds,
                cookie_name: "admin_session".to_string(),
                secure_cookie: true,
            });

            assert!(
                matches!(result, Err(SessionError::Configuration(_))),
                "ttl {} should be refused",
                ttl_seconds
            );
        }
    }

    #[test]
    fn test_longest_ttl_issues_a_live_token() {
        let service = SessionTokenService::new(SessionConfig {
            secret: "s3cret".to_string(),
            ttl_seconds: MAX_TTL_SECONDS,
            cookie_name: "admin_session".to_string(),
            secure_cookie: true,
        })
        .unwrap();
        let admin = identity(ADMIN_ROLE);

        let token = service.issue(&admin).unwrap();

        assert_eq!(service.validate(&token), Ok(admin));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let mut service = service_with_secret("s3cret");
        service.config.ttl_seconds = u64::MAX;

        let result = service.issue(&identity(ADMIN_ROLE));

        assert!(matches!(result, Err(SessionError::ExpiryOverflow)));
    }

    #[test]
    #[serial]
    fn test_session_config_from_env() {
        unsafe {
            std::env::set_var("SESSION_SECRET", "env-secret");
            std::env::set_var("SESSION_COOKIE_SECURE", "false");
            std::env::remove_var("SESSION_TTL_SECONDS");
            std::env::remove_var("SESSION_COOKIE_NAME");
        }

        let config = SessionConfig::from_env().unwrap();
        assert_eq!(config.secret, "env-secret");
        assert_eq!(config.ttl_seconds, 86400);
        assert_eq!(config.cookie_name, "admin_session");
        assert!(!config.secure_cookie);

        unsafe {
            std::env::remove_var("SESSION_SECRET");
            std::env::remove_var("SESSION_COOKIE_SECURE");
        }
    }
}
