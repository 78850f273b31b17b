/// Factory: build the process-wide token verifier from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{TokenVerifier, UnifiedJwtVerifier, VerifierSetupError};

pub fn build_verifier(config: &Config) -> Result<Arc<dyn TokenVerifier>, VerifierSetupError> {
    let verifier = UnifiedJwtVerifier::new(
        &config.secret_key,
        &config.jwt_algorithm,
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.token_leeway_seconds,
    )?;

    Ok(Arc::new(verifier))
}
