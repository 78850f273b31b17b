/*
 * Responsibility
 * - URL 構造を定義
 * - 認証の要否はパスで決まる (/api/ 以下のみ対象)。ルート側では route_layer を使わない
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::handlers::{
    health::{health, index},
    me::me,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/auth/me", get(me))
}
