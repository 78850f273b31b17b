/*
 * Responsibility
 * - GET /health, GET / (疎通用)
 * - どちらも認証ゲートの対象外
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

pub async fn index() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"service": env!("CARGO_PKG_NAME"), "status": "ok"})),
    )
}
