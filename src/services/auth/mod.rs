pub mod factory;
pub mod unified_jwt;
pub mod verifier;

pub use factory::build_verifier;
pub use unified_jwt::UnifiedJwtVerifier;
pub use verifier::{TokenVerifier, VerifiedUser, VerifierError, VerifierSetupError};
