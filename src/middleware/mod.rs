/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth: 認証ゲート, cors: ブラウザ向け CORS, http: request-id / 制限 / アクセスログ
 */
pub mod auth;
pub mod cors;
pub mod http;
