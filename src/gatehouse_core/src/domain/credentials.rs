use secrecy::{ExposeSecret, Secret};

use crate::domain::{
    username::Username,
    validation::{InputError, require},
};

/// A non-empty password. Strength rules belong to the identity provider.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl TryFrom<Secret<String>> for Password {
    type Error = InputError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().is_empty() {
            return Err(InputError::EmptyPassword);
        }
        Ok(Self(value))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

/// Username/password pair for password-based authentication.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: Username,
    pub password: Password,
}

impl Credentials {
    pub fn new(username: &str, password: Secret<String>) -> Result<Self, InputError> {
        Ok(Self {
            username: Username::parse(username)?,
            password: Password::try_from(password)?,
        })
    }
}

/// Everything needed to create an identity: sign-up and admin creation alike.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: Username,
    pub password: Password,
    pub display_name: String,
}

impl Registration {
    pub fn new(
        username: &str,
        password: Secret<String>,
        display_name: &str,
    ) -> Result<Self, InputError> {
        Ok(Self {
            username: Username::parse_email(username)?,
            password: Password::try_from(password)?,
            display_name: require(display_name, InputError::EmptyName)?,
        })
    }
}

/// A one-time code: sign-up confirmation or TOTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        require(raw, InputError::EmptyCode).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_normalize_username() {
        let credentials =
            Credentials::new("Dave@Example.com", Secret::new("hunter22".to_owned())).unwrap();
        assert_eq!(credentials.username.as_str(), "dave@example.com");
    }

    #[test]
    fn test_empty_password_is_rejected() {
        let result = Credentials::new("dave@example.com", Secret::new(String::new()));
        assert!(matches!(result, Err(InputError::EmptyPassword)));
    }

    #[test]
    fn test_registration_requires_name_and_email() {
        let missing_name =
            Registration::new("erin@example.com", Secret::new("pw".to_owned()), "  ");
        assert!(matches!(missing_name, Err(InputError::EmptyName)));

        let not_email = Registration::new("erin", Secret::new("pw".to_owned()), "Erin");
        assert!(matches!(not_email, Err(InputError::InvalidEmail)));
    }

    #[test]
    fn test_verification_code_is_trimmed() {
        assert_eq!(VerificationCode::parse(" 123456 ").unwrap().as_str(), "123456");
        assert_eq!(VerificationCode::parse(""), Err(InputError::EmptyCode));
    }
}
