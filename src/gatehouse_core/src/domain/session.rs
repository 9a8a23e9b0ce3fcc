use serde::Serialize;

/// Tokens issued by the identity provider. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    pub id_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Additional step the provider demands before it issues tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Challenge {
    /// The account was created with a temporary password that must be replaced.
    NewPasswordRequired,
    /// A TOTP code from the user's authenticator app is required.
    SoftwareTokenMfa,
}

impl Challenge {
    /// Resolves the provider's challenge name; `None` for challenges this
    /// service does not know how to answer.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NEW_PASSWORD_REQUIRED" => Some(Challenge::NewPasswordRequired),
            "SOFTWARE_TOKEN_MFA" => Some(Challenge::SoftwareTokenMfa),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Challenge::NewPasswordRequired => "NEW_PASSWORD_REQUIRED",
            Challenge::SoftwareTokenMfa => "SOFTWARE_TOKEN_MFA",
        }
    }
}

/// The result of a login attempt.
///
/// Mirrors the provider's multi-step exchange: either tokens are issued, or
/// a challenge must be answered using the returned `session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LoginOutcome {
    Authenticated(SessionTokens),
    #[serde(rename_all = "camelCase")]
    ChallengeRequired { challenge: Challenge, session: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedTokens {
    pub access_token: String,
    pub id_token: String,
}
