use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
    domain::{error::AuthError, group::Group},
    ports::token_verifier::VerifiedToken,
};

/// Identity extracted from a verified bearer token.
///
/// Outside this crate the only constructor is
/// [`crate::TokenVerifier::verify_claims`]:
///
/// ```compile_fail
/// use gatehouse_core::{Claims, VerifiedToken};
///
/// let forged = VerifiedToken {
///     subject: "sub".to_owned(),
///     email: None,
///     groups: vec!["Admin".to_owned()],
/// };
/// let _ = Claims::from_verified(forged);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    email: String,
    subject_id: String,
    groups: BTreeSet<String>,
}

impl Claims {
    pub(crate) fn from_verified(token: VerifiedToken) -> Self {
        Self {
            email: token.email.unwrap_or_default(),
            subject_id: token.subject,
            groups: token.groups.into_iter().collect(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    pub fn is_member_of(&self, group: Group) -> bool {
        self.groups.contains(group.as_str())
    }

    pub fn require_group(&self, group: Group) -> Result<(), AuthError> {
        if self.is_member_of(group) {
            Ok(())
        } else {
            Err(AuthError::unauthorized("Insufficient permissions"))
        }
    }
}
