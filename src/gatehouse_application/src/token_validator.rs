use gatehouse_core::{AuthError, Claims, TokenVerifier, VerificationError};

/// Turns bearer tokens into [`Claims`].
///
/// Every call re-verifies; there is no result cache. Verifier diagnostics
/// are logged, never returned.
#[derive(Clone)]
pub struct TokenValidator<V> {
    verifier: V,
}

impl<V: TokenVerifier> TokenValidator<V> {
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    #[tracing::instrument(name = "TokenValidator::validate", skip_all)]
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::unauthorized("Missing token"));
        }

        match self.verifier.verify_claims(token) {
            Ok(claims) => Ok(claims),
            Err(VerificationError::Expired) => {
                tracing::debug!("Rejected expired token");
                Err(AuthError::unauthorized("Token expired"))
            }
            Err(error) => {
                tracing::warn!(%error, "Token verification failed");
                Err(AuthError::unauthorized("Invalid token"))
            }
        }
    }
}
