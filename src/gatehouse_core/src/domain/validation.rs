use thiserror::Error;

use crate::domain::error::AuthError;

/// Structural input failures raised before anything reaches the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Username is required")]
    EmptyUsername,
    #[error("Username must be a valid email address")]
    InvalidEmail,
    #[error("Password is required")]
    EmptyPassword,
    #[error("Name is required")]
    EmptyName,
    #[error("Code is required")]
    EmptyCode,
    #[error("Token is required")]
    EmptyToken,
    #[error("Session is required")]
    EmptySession,
    #[error("Unknown group: {0}")]
    UnknownGroup(String),
}

impl From<InputError> for AuthError {
    fn from(error: InputError) -> Self {
        AuthError::bad_request(error.to_string())
    }
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require(value: &str, error: InputError) -> Result<String, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

/// Returns `token` unchanged unless it is blank.
pub fn require_token(token: &str) -> Result<&str, InputError> {
    if token.trim().is_empty() {
        return Err(InputError::EmptyToken);
    }
    Ok(token)
}

/// Returns the challenge session unchanged unless it is blank.
pub fn require_session(session: &str) -> Result<&str, InputError> {
    if session.trim().is_empty() {
        return Err(InputError::EmptySession);
    }
    Ok(session)
}
