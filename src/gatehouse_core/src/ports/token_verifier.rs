use thiserror::Error;

use crate::domain::claims::Claims;

/// Claims pulled out of a token whose signature and expiry were checked.
///
/// Built by [`TokenVerifier`] implementations only. Everything downstream of
/// verification works with [`Claims`], which can only be obtained through
/// [`TokenVerifier::verify_claims`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub email: Option<String>,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Malformed token: {0}")]
    Malformed(String),
    #[error("Invalid claims: {0}")]
    InvalidClaims(String),
    #[error("No verification key for token: {0}")]
    UnknownKey(String),
}

/// Cryptographic verification of bearer tokens.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedToken, VerificationError>;

    fn verify_claims(&self, token: &str) -> Result<Claims, VerificationError> {
        self.verify(token).map(Claims::from_verified)
    }
}
