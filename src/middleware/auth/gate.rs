//! Request auth gate: the per-request decision behind the auth middleware.
//!
//! Order (first match wins):
//! 1. exempt paths (`/health`, `/`, `/favicon.ico`, `/files/*`) pass
//! 2. `OPTIONS` (CORS preflight) passes
//! 3. anything outside `/api/*` passes
//! 4. `/api/*` needs an `Authorization` header the verifier resolves to a user

use std::sync::Arc;

use axum::http::{HeaderMap, Method, header};

use crate::api::extractors::CurrentUser;
use crate::error::AuthError;
use crate::services::auth::TokenVerifier;

pub const EXEMPT_PATHS: [&str; 3] = ["/health", "/", "/favicon.ico"];
pub const EXEMPT_PREFIX: &str = "/files/";
pub const GATED_PREFIX: &str = "/api/";

/// Whether a route requires authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    None,
    Required,
}

/// Classify a request by method and original path (steps 1-3).
pub fn requirement(method: &Method, path: &str) -> AuthRequirement {
    if EXEMPT_PATHS.contains(&path) || path.starts_with(EXEMPT_PREFIX) {
        return AuthRequirement::None;
    }
    if *method == Method::OPTIONS {
        return AuthRequirement::None;
    }
    if !path.starts_with(GATED_PREFIX) {
        return AuthRequirement::None;
    }

    AuthRequirement::Required
}

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed without an identity.
    Allow,
    /// Proceed with this user written into the request context.
    AllowWithIdentity(CurrentUser),
    /// Stop here and answer 401.
    Reject(AuthError),
}

#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn TokenVerifier>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Evaluate a request snapshot.
    ///
    /// Holds no state between calls, so the same snapshot always yields the same
    /// decision as long as the verifier answers the same way.
    pub async fn evaluate(&self, method: &Method, path: &str, headers: &HeaderMap) -> Decision {
        if requirement(method, path) == AuthRequirement::None {
            return Decision::Allow;
        }

        let Some(raw) = headers
            .get(header::AUTHORIZATION)
            .filter(|v| !v.is_empty())
        else {
            tracing::debug!(%method, path, "missing authorization header");
            return Decision::Reject(AuthError::MissingCredential);
        };

        let Ok(authorization) = raw.to_str() else {
            tracing::warn!(%method, path, "authorization header is not visible ascii");
            return Decision::Reject(AuthError::InvalidCredential);
        };

        match self.verifier.get_user_from_token(authorization).await {
            Ok(Some(user)) => {
                tracing::debug!(%method, path, user_id = %user.id, "request authenticated");
                Decision::AllowWithIdentity(user.into())
            }
            Ok(None) => {
                tracing::warn!(%method, path, "invalid or expired token");
                Decision::Reject(AuthError::InvalidCredential)
            }
            // Verifier failures are answered like a bad token (401), but logged loudly.
            Err(err) => {
                tracing::error!(%method, path, error = %err, "token verifier failed");
                Decision::Reject(AuthError::InvalidCredential)
            }
        }
    }
}
