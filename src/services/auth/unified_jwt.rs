use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;

use crate::services::auth::verifier::{
    TokenVerifier, VerifiedUser, VerifierError, VerifierSetupError,
};

/// Claims issued by the main system's login.
///
/// NOTE:
/// - The subject is `sub`; older tokens only carry `user_id` (string or number).
/// - Profile claims are optional and passed through as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct UnifiedClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,

    pub exp: u64,

    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UnifiedClaims {
    fn subject(&self) -> Option<String> {
        if let Some(sub) = self.sub.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return Some(sub.to_string());
        }

        match self.user_id.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Shared-secret (HMAC) JWT verifier for tokens minted by the main system.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct UnifiedJwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for UnifiedJwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedJwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl UnifiedJwtVerifier {
    pub fn new(
        secret_key: &str,
        algorithm: &str,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, VerifierSetupError> {
        if secret_key.is_empty() {
            return Err(VerifierSetupError::EmptySecret);
        }

        let algorithm = match algorithm.to_ascii_uppercase().as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => return Err(VerifierSetupError::UnsupportedAlgorithm(other.to_string())),
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = leeway_seconds;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            // Main-system tokens may carry an `aud` we do not care about.
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
            validation,
        })
    }

    /// Verify and decode a bare JWT (no scheme prefix).
    pub fn verify(&self, token: &str) -> Result<UnifiedClaims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<UnifiedClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}

/// Extract the token from an `Authorization` value.
///
/// Accepts `Bearer <token>` (scheme is case-insensitive) or a bare token.
/// Any other scheme yields `None`.
pub fn bearer_token(authorization: &str) -> Option<&str> {
    let value = authorization.trim();
    if value.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return None,
        None => value,
    };

    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl TokenVerifier for UnifiedJwtVerifier {
    async fn get_user_from_token(
        &self,
        authorization: &str,
    ) -> Result<Option<VerifiedUser>, VerifierError> {
        let Some(token) = bearer_token(authorization) else {
            tracing::debug!("authorization header is not a bearer token");
            return Ok(None);
        };

        let claims = match self.verify(token) {
            Ok(claims) => claims,
            Err(err) => {
                return match err.kind() {
                    // Not expected with an HMAC secret; kept so a bad key is never reported as a bad token.
                    ErrorKind::InvalidKeyFormat => Err(VerifierError::Key(err.to_string())),
                    _ => {
                        tracing::debug!(error = %err, "token rejected");
                        Ok(None)
                    }
                };
            }
        };

        let Some(id) = claims.subject() else {
            tracing::debug!("token has no subject");
            return Ok(None);
        };

        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Ok(Some(VerifiedUser {
            id,
            username: claims.username,
            email: claims.email,
            role: claims.role,
            expires_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::{Value, json};

    const SECRET: &str = "main-system-secret";

    fn verifier() -> UnifiedJwtVerifier {
        UnifiedJwtVerifier::new(SECRET, "HS256", None, None, 30).unwrap()
    }

    fn mint(claims: &Value, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_ten_minutes() -> i64 {
        Utc::now().timestamp() + 600
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer   abc"), Some("abc"));
        assert_eq!(bearer_token("abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("  bearer\t "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("   "), None);
    }

    #[test]
    fn setup_rejects_empty_secret_and_unknown_algorithm() {
        assert_eq!(
            UnifiedJwtVerifier::new("", "HS256", None, None, 0).err(),
            Some(VerifierSetupError::EmptySecret)
        );
        assert_eq!(
            UnifiedJwtVerifier::new(SECRET, "RS256", None, None, 0).err(),
            Some(VerifierSetupError::UnsupportedAlgorithm("RS256".to_string()))
        );
    }

    #[tokio::test]
    async fn resolves_valid_token() {
        let exp = in_ten_minutes();
        let token = mint(
            &json!({"sub": "u1", "username": "alice", "role": "admin", "exp": exp}),
            SECRET,
        );

        let user = verifier()
            .get_user_from_token(&format!("Bearer {token}"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.role.as_deref(), Some("admin"));
        assert_eq!(user.email, None);
        assert_eq!(user.expires_at.map(|t| t.timestamp()), Some(exp));
    }

    #[tokio::test]
    async fn falls_back_to_numeric_user_id() {
        let token = mint(&json!({"user_id": 42, "exp": in_ten_minutes()}), SECRET);

        let user = verifier().get_user_from_token(&token).await.unwrap().unwrap();

        assert_eq!(user.id, "42");
    }

    #[tokio::test]
    async fn rejects_without_subject() {
        let token = mint(&json!({"username": "nobody", "exp": in_ten_minutes()}), SECRET);

        let res = verifier().get_user_from_token(&token).await.unwrap();

        assert!(res.is_none());
    }

    #[tokio::test]
    async fn rejects_wrong_secret_expired_and_garbage() {
        let v = verifier();

        let forged = mint(&json!({"sub": "u1", "exp": in_ten_minutes()}), "other-secret");
        assert!(v.get_user_from_token(&forged).await.unwrap().is_none());

        let expired = mint(
            &json!({"sub": "u1", "exp": Utc::now().timestamp() - 3600}),
            SECRET,
        );
        assert!(v.get_user_from_token(&expired).await.unwrap().is_none());

        assert!(
            v.get_user_from_token("Bearer badtoken")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn ignores_foreign_audience_unless_configured() {
        let token = mint(
            &json!({"sub": "u1", "aud": "main-web", "iss": "main", "exp": in_ten_minutes()}),
            SECRET,
        );

        assert!(verifier().get_user_from_token(&token).await.unwrap().is_some());

        let strict =
            UnifiedJwtVerifier::new(SECRET, "HS256", Some("main"), Some("slides"), 30).unwrap();
        assert!(strict.get_user_from_token(&token).await.unwrap().is_none());
    }
}
