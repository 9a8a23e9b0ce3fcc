use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::validation::InputError;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Canonical form used for every provider call and comparison.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A normalized, non-empty username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, InputError> {
        let normalized = normalize(raw.as_ref());
        if normalized.is_empty() {
            return Err(InputError::EmptyUsername);
        }
        Ok(Self(normalized))
    }

    /// Same as [`Username::parse`] but additionally requires an email address,
    /// for flows where the username doubles as the `email` attribute.
    pub fn parse_email(raw: impl AsRef<str>) -> Result<Self, InputError> {
        let username = Self::parse(raw)?;
        if !username.is_email() {
            return Err(InputError::InvalidEmail);
        }
        Ok(username)
    }

    pub fn is_email(&self) -> bool {
        EMAIL_REGEX.is_match(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn normalize_is_idempotent(raw: String) -> bool {
        normalize(&raw) == normalize(&normalize(&raw))
    }

    #[quickcheck]
    fn lowercased_input_normalizes_identically(raw: String) -> bool {
        normalize(&raw) == normalize(&raw.to_lowercase())
    }

    #[quickcheck]
    fn ascii_case_variants_normalize_identically(raw: String) -> bool {
        let raw: String = raw.chars().filter(char::is_ascii).collect();
        normalize(&raw.to_ascii_uppercase()) == normalize(&raw.to_ascii_lowercase())
    }

    #[test]
    fn test_parse_lowercases_and_trims() {
        let username = Username::parse("  Alice@Example.COM ").unwrap();
        assert_eq!(username.as_str(), "alice@example.com");
    }

    #[test]
    fn test_case_variants_produce_equal_usernames() {
        let a = Username::parse("BOB@example.com").unwrap();
        let b = Username::parse("bob@EXAMPLE.com").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_username_is_rejected() {
        assert_eq!(Username::parse("   "), Err(InputError::EmptyUsername));
    }

    #[test]
    fn test_parse_email_requires_email_shape() {
        assert!(Username::parse_email("alice@example.com").is_ok());
        assert_eq!(
            Username::parse_email("alice"),
            Err(InputError::InvalidEmail)
        );
    }

    #[test]
    fn test_deserialize_normalizes() {
        let username: Username = serde_json::from_str("\"CAROL@Example.com\"").unwrap();
        assert_eq!(username.as_str(), "carol@example.com");
    }
}
