//! Route access predicates.

use crate::role::Role;

/// The two access levels a route can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any caller whose credential verified.
    Authenticated,
    /// Callers with `manager` or `admin` role.
    Elevated,
}

impl AccessPolicy {
    /// Pure check; no lookups happen here.
    pub fn permits(self, role: Role) -> bool {
        match self {
            Self::Authenticated => true,
            Self::Elevated => role.is_elevated(),
        }
    }
}
