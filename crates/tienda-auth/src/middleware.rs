//! Request authentication state and axum middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token::{Claims, JwtService};

/// Shared authentication state: config plus the token service.
///
/// Constructed once at startup and injected where needed; there is no global
/// auth singleton.
#[derive(Debug, Clone)]
pub struct AuthState {
    config: AuthConfig,
    jwt: Option<JwtService>,
}

impl AuthState {
    /// Builds the state from config. The token service is only constructed
    /// when auth is enabled (a disabled instance never signs or verifies).
    pub fn from_config(config: AuthConfig) -> Result<Self, AuthError> {
        let jwt = if config.enabled {
            Some(JwtService::new(&config.jwt_secret)?)
        } else {
            None
        };
        Ok(Self { config, jwt })
    }

    /// Whether Bearer authentication is enforced.
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Checks credentials against the configured user and issues a token.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` when the pair does not match;
    /// `Configuration` when called while auth is disabled.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let jwt = self
            .jwt
            .as_ref()
            .ok_or_else(|| AuthError::configuration("login requested but auth is disabled"))?;

        let user = &self.config.default_user;
        if email != user.email || password != user.password {
            return Err(AuthError::InvalidCredentials);
        }

        jwt.issue("1", email, Duration::from_secs(self.config.token_ttl_secs))
    }

    /// Verifies a Bearer token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let jwt = self
            .jwt
            .as_ref()
            .ok_or_else(|| AuthError::configuration("verify requested but auth is disabled"))?;
        jwt.verify(token)
    }
}

/// Middleware that requires a valid Bearer token on the wrapped routes.
///
/// When auth is disabled the request passes through untouched. On success the
/// verified [`Claims`] are stored in request extensions for downstream
/// handlers.
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if !state.enabled() {
        return next.run(req).await;
    }

    let header = match req.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        Some(h) => h,
        None => {
            tracing::debug!(path = %req.uri().path(), "missing Authorization header");
            return unauthorized_response("Authentication required");
        }
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) if !t.is_empty() => t,
        _ => return unauthorized_response("Invalid Authorization header format"),
    };

    match state.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "token validation failed");
            match e {
                AuthError::Expired => unauthorized_response("Token expired"),
                _ => unauthorized_response("Invalid token"),
            }
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
