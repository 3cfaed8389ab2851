//! Account role types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account permission level.
///
/// Wire format: lowercase string (`"user"`, `"manager"`, `"admin"`).
/// `Manager` and `Admin` are the elevated roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Manager,
    Admin,
}

/// Returned when a role string is not one of the known wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }

    /// `true` for roles allowed to manage inventory and send alerts.
    pub fn is_elevated(self) -> bool {
        matches!(self, Self::Manager | Self::Admin)
    }

    /// Parse a stored role, falling back to [`Role::User`] for anything unknown.
    ///
    /// Used when reading persisted records: a corrupted or legacy value must
    /// never grant more than the base role.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
