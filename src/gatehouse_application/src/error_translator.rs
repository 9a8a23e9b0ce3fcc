//! Allow-list translation of identity provider failures.
//!
//! Each operation owns a fixed table of provider error kinds it knows how to
//! explain to a client. Anything not in the table is logged in full and
//! returned as the opaque internal error, so a new provider failure mode can
//! never masquerade as a specific client error.

use std::fmt;

use gatehouse_core::{
    AuthError, ProviderError,
    ProviderErrorKind::{self, *},
    StatusClass::{self, *},
};

/// Provider-facing operations, each with its own translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    SetNewPassword,
    VerifyLoginMfa,
    RefreshToken,
    SignUp,
    ConfirmSignUp,
    ResendConfirmationCode,
    GetUser,
    AdminGetUser,
    AddGroup,
    RemoveGroup,
    CreateAdmin,
    AddMfa,
    VerifyMfa,
    SetMfaPreference,
    AdminSetMfaPreference,
    Logout,
}

impl Operation {
    pub const ALL: [Operation; 17] = [
        Operation::Login,
        Operation::SetNewPassword,
        Operation::VerifyLoginMfa,
        Operation::RefreshToken,
        Operation::SignUp,
        Operation::ConfirmSignUp,
        Operation::ResendConfirmationCode,
        Operation::GetUser,
        Operation::AdminGetUser,
        Operation::AddGroup,
        Operation::RemoveGroup,
        Operation::CreateAdmin,
        Operation::AddMfa,
        Operation::VerifyMfa,
        Operation::SetMfaPreference,
        Operation::AdminSetMfaPreference,
        Operation::Logout,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::SetNewPassword => "set_new_password",
            Operation::VerifyLoginMfa => "verify_login_mfa",
            Operation::RefreshToken => "refresh_token",
            Operation::SignUp => "sign_up",
            Operation::ConfirmSignUp => "confirm_sign_up",
            Operation::ResendConfirmationCode => "resend_confirmation_code",
            Operation::GetUser => "get_user",
            Operation::AdminGetUser => "admin_get_user",
            Operation::AddGroup => "add_group",
            Operation::RemoveGroup => "remove_group",
            Operation::CreateAdmin => "create_admin",
            Operation::AddMfa => "add_mfa",
            Operation::VerifyMfa => "verify_mfa",
            Operation::SetMfaPreference => "set_mfa_preference",
            Operation::AdminSetMfaPreference => "admin_set_mfa_preference",
            Operation::Logout => "logout",
        }
    }

    fn rules(self) -> &'static [Rule] {
        match self {
            Operation::Login => LOGIN,
            Operation::SetNewPassword => SET_NEW_PASSWORD,
            Operation::VerifyLoginMfa => VERIFY_LOGIN_MFA,
            Operation::RefreshToken => REFRESH_TOKEN,
            Operation::SignUp | Operation::CreateAdmin => CREATE_IDENTITY,
            Operation::ConfirmSignUp => CONFIRM_SIGN_UP,
            Operation::ResendConfirmationCode => RESEND_CONFIRMATION_CODE,
            Operation::GetUser => GET_USER,
            Operation::AdminGetUser => ADMIN_GET_USER,
            Operation::AddGroup | Operation::RemoveGroup => GROUP_MEMBERSHIP,
            Operation::AddMfa | Operation::Logout => ACCESS_TOKEN,
            Operation::VerifyMfa => VERIFY_MFA,
            Operation::SetMfaPreference => SET_MFA_PREFERENCE,
            Operation::AdminSetMfaPreference => ADMIN_SET_MFA_PREFERENCE,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct Rule {
    kind: ProviderErrorKind,
    status: StatusClass,
    message: &'static str,
}

const fn rule(kind: ProviderErrorKind, status: StatusClass, message: &'static str) -> Rule {
    Rule {
        kind,
        status,
        message,
    }
}

const WEAK_PASSWORD: &str = "Password does not meet requirements";
const INVALID_ACCESS_TOKEN: &str = "Invalid access token";
const INVALID_SESSION: &str = "Invalid session";
const USER_NOT_FOUND: &str = "User not found";

const LOGIN: &[Rule] = &[
    rule(NotAuthorized, Unauthorized, "Invalid username or password"),
    rule(PasswordResetRequired, Unauthorized, "Password reset required"),
    rule(UserNotConfirmed, Unauthorized, "User not confirmed"),
];

const SET_NEW_PASSWORD: &[Rule] = &[
    rule(NotAuthorized, Unauthorized, INVALID_SESSION),
    rule(CodeMismatch, Unauthorized, INVALID_SESSION),
    rule(ExpiredCode, Unauthorized, INVALID_SESSION),
    rule(InvalidPassword, BadRequest, WEAK_PASSWORD),
];

const VERIFY_LOGIN_MFA: &[Rule] = &[
    rule(CodeMismatch, Unauthorized, "Invalid MFA code"),
    rule(ExpiredCode, Unauthorized, "MFA session expired"),
    rule(NotAuthorized, Unauthorized, INVALID_SESSION),
];

const REFRESH_TOKEN: &[Rule] = &[rule(NotAuthorized, Unauthorized, "Invalid refresh token")];

const CREATE_IDENTITY: &[Rule] = &[
    rule(UsernameExists, Conflict, "Username already exists"),
    rule(InvalidPassword, BadRequest, WEAK_PASSWORD),
];

const CONFIRM_SIGN_UP: &[Rule] = &[
    rule(CodeMismatch, BadRequest, "Invalid confirmation code"),
    rule(ExpiredCode, BadRequest, "Confirmation code expired"),
];

const RESEND_CONFIRMATION_CODE: &[Rule] = &[
    rule(UserNotFound, NotFound, USER_NOT_FOUND),
    rule(InvalidParameter, BadRequest, "User already confirmed"),
    rule(LimitExceeded, BadRequest, "Too many attempts, try again later"),
];

const GET_USER: &[Rule] = &[
    rule(NotAuthorized, Unauthorized, INVALID_ACCESS_TOKEN),
    rule(UserNotFound, NotFound, USER_NOT_FOUND),
];

const ADMIN_GET_USER: &[Rule] = &[rule(UserNotFound, NotFound, USER_NOT_FOUND)];

const GROUP_MEMBERSHIP: &[Rule] = &[
    rule(UserNotFound, NotFound, USER_NOT_FOUND),
    rule(ResourceNotFound, NotFound, "Group not found"),
];

const ACCESS_TOKEN: &[Rule] = &[rule(NotAuthorized, Unauthorized, INVALID_ACCESS_TOKEN)];

const VERIFY_MFA: &[Rule] = &[
    rule(NotAuthorized, Unauthorized, INVALID_ACCESS_TOKEN),
    rule(CodeMismatch, BadRequest, "Invalid MFA code"),
    rule(EnableSoftwareTokenMfa, BadRequest, "Invalid MFA code"),
];

const SET_MFA_PREFERENCE: &[Rule] = &[
    rule(NotAuthorized, Unauthorized, INVALID_ACCESS_TOKEN),
    rule(InvalidParameter, BadRequest, "MFA is not configured"),
];

const ADMIN_SET_MFA_PREFERENCE: &[Rule] = &[
    rule(UserNotFound, NotFound, USER_NOT_FOUND),
    rule(InvalidParameter, BadRequest, "MFA is not configured"),
];

/// Maps a provider failure to the domain taxonomy for `operation`.
///
/// Unlisted kinds are logged with full detail and become
/// [`AuthError::internal`].
pub fn translate(operation: Operation, error: &ProviderError) -> AuthError {
    match operation
        .rules()
        .iter()
        .find(|rule| rule.kind == error.kind)
    {
        Some(rule) => {
            tracing::debug!(%operation, kind = ?error.kind, "Translated identity provider error");
            AuthError::new(rule.status, rule.message)
        }
        None => {
            tracing::error!(
                %operation,
                kind = ?error.kind,
                code = error.code.as_deref().unwrap_or("-"),
                message = %error.message,
                "Unclassified identity provider error"
            );
            AuthError::internal()
        }
    }
}
