/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: 認証ゲート (プロセスで一つの verifier を共有する)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::middleware::auth::AuthGate;
use crate::services::auth::TokenVerifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: AuthGate,
}

impl AppState {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            gate: AuthGate::new(verifier),
        }
    }
}
