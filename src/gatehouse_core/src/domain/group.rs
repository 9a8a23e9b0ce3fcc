use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::validation::InputError;

/// The closed set of groups the identity provider pool is expected to define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Group {
    Admin,
    User,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::Admin, Group::User];

    /// The provider-side group name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Group::Admin => "Admin",
            Group::User => "User",
        }
    }
}

impl FromStr for Group {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Group::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InputError::UnknownGroup(s.to_owned()))
    }
}

impl TryFrom<String> for Group {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Group> for &'static str {
    fn from(group: Group) -> Self {
        group.as_str()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
