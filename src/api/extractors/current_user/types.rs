/*
 * Responsibility
 * - Handler から見える「認証済み利用者」の型
 * - 認証ゲートが検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証ロジックは services 側の責務
 * - リクエスト単位のスロットであり、リクエストをまたいで保持しない
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::auth::VerifiedUser;

/// 認証済みのリクエストに付与される利用者情報
///
/// - `id` は主システム側のユーザーID
/// - `role` は coarse-grained な情報（認可判断はこのクレートの責務外）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl From<VerifiedUser> for CurrentUser {
    fn from(user: VerifiedUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            token_expires_at: user.expires_at,
        }
    }
}
