use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    credentials::{Password, VerificationCode},
    username::Username,
};

/// Failure category reported by an identity provider.
///
/// Adapters map their wire-level error codes onto these kinds; the error
/// translator only ever looks at the kind, never at the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    NotAuthorized,
    PasswordResetRequired,
    UserNotConfirmed,
    UsernameExists,
    CodeMismatch,
    ExpiredCode,
    UserNotFound,
    ResourceNotFound,
    InvalidPassword,
    InvalidParameter,
    LimitExceeded,
    TooManyRequests,
    EnableSoftwareTokenMfa,
    /// The provider could not be reached or answered with something unreadable.
    Transport,
    /// A well-formed failure with a code nobody has mapped yet.
    Unknown,
}

#[derive(Debug, Clone, Error)]
#[error("identity provider error {kind:?} ({}): {message}", .code.as_deref().unwrap_or("-"))]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    /// Raw provider error code, kept for diagnostics.
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAttribute {
    pub name: String,
    pub value: String,
}

impl UserAttribute {
    pub const EMAIL: &'static str = "email";
    pub const NAME: &'static str = "name";

    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTokens {
    pub access_token: String,
    pub id_token: String,
    pub refresh_token: Option<String>,
}

/// Result of any step of the provider's authentication exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationResult {
    Tokens(ProviderTokens),
    /// The provider wants another round trip; `name` is its challenge name.
    Challenge { name: String, session: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSignUp {
    pub user_confirmed: bool,
    pub user_sub: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    pub username: String,
    pub attributes: Vec<UserAttribute>,
}

impl ProviderUser {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }
}

/// Client of the managed identity provider.
///
/// Implementations must be safe for concurrent use; every method is a single
/// round trip with no retries.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn initiate_password_auth(
        &self,
        username: &Username,
        password: &Password,
    ) -> Result<AuthenticationResult, ProviderError>;

    async fn respond_to_new_password_challenge(
        &self,
        username: &Username,
        new_password: &Password,
        session: &str,
    ) -> Result<AuthenticationResult, ProviderError>;

    async fn respond_to_mfa_challenge(
        &self,
        username: &Username,
        code: &VerificationCode,
        session: &str,
    ) -> Result<AuthenticationResult, ProviderError>;

    async fn refresh_tokens(&self, refresh_token: &str)
    -> Result<AuthenticationResult, ProviderError>;

    async fn sign_up(
        &self,
        username: &Username,
        password: &Password,
        attributes: &[UserAttribute],
    ) -> Result<ProviderSignUp, ProviderError>;

    async fn confirm_sign_up(
        &self,
        username: &Username,
        code: &VerificationCode,
    ) -> Result<(), ProviderError>;

    async fn resend_confirmation_code(&self, username: &Username) -> Result<(), ProviderError>;

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError>;

    async fn admin_get_user(&self, username: &Username) -> Result<ProviderUser, ProviderError>;

    /// Creates an identity with a temporary password and has the provider
    /// deliver the credentials to the user by email.
    async fn admin_create_user(
        &self,
        username: &Username,
        temporary_password: &Password,
        attributes: &[UserAttribute],
    ) -> Result<ProviderUser, ProviderError>;

    async fn admin_add_user_to_group(
        &self,
        username: &Username,
        group: &str,
    ) -> Result<(), ProviderError>;

    async fn admin_remove_user_from_group(
        &self,
        username: &Username,
        group: &str,
    ) -> Result<(), ProviderError>;

    /// Starts TOTP enrolment and returns the shared secret.
    async fn associate_software_token(&self, access_token: &str) -> Result<String, ProviderError>;

    async fn verify_software_token(
        &self,
        access_token: &str,
        code: &VerificationCode,
    ) -> Result<(), ProviderError>;

    async fn set_software_token_mfa(
        &self,
        access_token: &str,
        enabled: bool,
    ) -> Result<(), ProviderError>;

    async fn admin_set_software_token_mfa(
        &self,
        username: &Username,
        enabled: bool,
    ) -> Result<(), ProviderError>;

    /// Invalidates every token issued to the owner of `access_token`.
    async fn global_sign_out(&self, access_token: &str) -> Result<(), ProviderError>;
}
