//! Token verifier interface shared by the auth gate.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Identity resolved from a credential by a [`TokenVerifier`].
///
/// The gate does not interpret these fields; it only turns them into the
/// request-scoped `CurrentUser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl VerifiedUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            email: None,
            role: None,
            expires_at: None,
        }
    }
}

/// Verifier-internal failures.
///
/// These are not "bad token" answers (that is `Ok(None)`); they mean the verifier
/// itself could not do its job. The gate still answers 401 for them.
///
/// The shared-secret JWT verifier decodes locally and practically never fails this
/// way; `Backend` is for verifiers that call out (introspection endpoint, key
/// service, session store).
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("verifier key error: {0}")]
    Key(String),
    #[error("verifier backend error: {0}")]
    Backend(String),
}

/// Turns a raw `Authorization` header value into a resolved identity.
///
/// - `Ok(Some(user))`: credential accepted
/// - `Ok(None)`: malformed, unsigned, expired or otherwise rejected credential
/// - `Err(_)`: the verifier failed internally
///
/// Implementations are shared across concurrent requests (`Arc<dyn TokenVerifier>`).
#[async_trait]
pub trait TokenVerifier: Send + Sync + 'static {
    async fn get_user_from_token(
        &self,
        authorization: &str,
    ) -> Result<Option<VerifiedUser>, VerifierError>;
}

/// Constructor-time errors for verifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifierSetupError {
    #[error("secret key must not be empty")]
    EmptySecret,
    #[error("unsupported jwt algorithm: {0}")]
    UnsupportedAlgorithm(String),
}
