//! 認証ゲートを axum middleware として配線する
//!
//! - AuthGate の判定結果に従って、素通し / 401 で打ち切り / CurrentUser を extensions に入れる
//! - 判定はリクエスト元のパス（nest 前の OriginalUri）で行う

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AuthError;
use crate::middleware::auth::gate::Decision;
use crate::state::AppState;

/// ルーター全体に認証ゲートを掛ける。
///
/// 例：
/// ```ignore
/// let router = api::routes();
/// let router = middleware::auth::access::apply(router, state.clone());
/// let app = router.with_state(state);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let decision = state
        .gate
        .evaluate(req.method(), original_uri.path(), req.headers())
        .await;

    match decision {
        Decision::Allow => Ok(next.run(req).await),
        Decision::AllowWithIdentity(user) => {
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Decision::Reject(err) => Err(err),
    }
}
