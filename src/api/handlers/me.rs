/*
 * Responsibility
 * - GET /api/auth/me
 * - 認証ゲートが解決した利用者をそのまま返す (フロントエンドのログイン状態確認用)
 */
use axum::Json;
use serde::Serialize;

use crate::api::extractors::{CurrentUser, CurrentUserExtractor};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub data: CurrentUser,
}

pub async fn me(CurrentUserExtractor(user): CurrentUserExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        data: user,
    })
}
