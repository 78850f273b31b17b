/*
 * Responsibility
 * - 認証ゲートが返すエラー (AuthError) の定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - body は `{"success": false, "error": "<message>"}` に固定
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Terminal authentication failures produced by the gate.
///
/// Both kinds answer 401 and never reach the route handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingCredential,
    #[error("Invalid or expired token")]
    InvalidCredential,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn body_json(err: AuthError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_credential_body() {
        let (status, body) = body_json(AuthError::MissingCredential).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({"success": false, "error": "Missing authorization header"})
        );
    }

    #[tokio::test]
    async fn invalid_credential_body() {
        let (status, body) = body_json(AuthError::InvalidCredential).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({"success": false, "error": "Invalid or expired token"})
        );
    }
}
