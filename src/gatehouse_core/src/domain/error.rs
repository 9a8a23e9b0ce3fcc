use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;

/// Severity class of a domain error. Each class maps to exactly one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusClass {
    Unauthorized,
    NotFound,
    Conflict,
    BadRequest,
    Internal,
}

impl StatusClass {
    pub const fn http_status(self) -> u16 {
        match self {
            StatusClass::Unauthorized => 401,
            StatusClass::NotFound => 404,
            StatusClass::Conflict => 409,
            StatusClass::BadRequest => 400,
            StatusClass::Internal => 500,
        }
    }
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Provider-agnostic error returned to callers of the orchestration layer.
///
/// The message is always safe to show to clients: provider and library
/// diagnostics are logged where they occur and never copied in here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    status: StatusClass,
    message: Cow<'static, str>,
}

impl AuthError {
    pub fn new(status: StatusClass, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusClass::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusClass::NotFound, message)
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusClass::Conflict, message)
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusClass::BadRequest, message)
    }

    /// The opaque internal error. Callers learn nothing beyond "it failed".
    pub fn internal() -> Self {
        Self::new(StatusClass::Internal, INTERNAL_ERROR_MESSAGE)
    }

    pub fn status(&self) -> StatusClass {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_status(&self) -> u16 {
        self.status.http_status()
    }
}
