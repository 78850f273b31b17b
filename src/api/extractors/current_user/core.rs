use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AuthError;

use super::CurrentUser;

/// Handler で CurrentUser を受け取るための extractor
/// 認証ゲートが CurrentUser を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（ゲート対象外のルート・ミドルウェア未設定）
pub struct CurrentUserExtractor(pub CurrentUser);

impl<S> FromRequestParts<S> for CurrentUserExtractor
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(CurrentUserExtractor)
            .ok_or(AuthError::MissingCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn reads_user_from_extensions() {
        let (mut parts, ()) = Request::builder()
            .uri("/api/auth/me")
            .body(())
            .unwrap()
            .into_parts();
        let user = CurrentUser {
            id: "u1".to_string(),
            username: None,
            email: None,
            role: None,
            token_expires_at: None,
        };
        parts.extensions.insert(user.clone());

        let CurrentUserExtractor(found) = CurrentUserExtractor::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn rejects_when_gate_did_not_run() {
        let (mut parts, ()) = Request::builder()
            .uri("/api/auth/me")
            .body(())
            .unwrap()
            .into_parts();

        let res = CurrentUserExtractor::from_request_parts(&mut parts, &()).await;

        assert_eq!(res.err(), Some(AuthError::MissingCredential));
    }
}
