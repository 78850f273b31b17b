//! Request authentication gate for the slides backend.
//!
//! Every request passes through [`middleware::auth::AuthGate`]: exempt routes go
//! straight through, `/api/*` routes need an `Authorization` header that the
//! main system's shared-secret verifier resolves to a user. The resolved user is
//! stored in request extensions as [`api::extractors::CurrentUser`].

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
