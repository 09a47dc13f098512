//! Roles, lookup outcomes, and the navigation targets bound to them.

use crate::profile::{Profile, UserId};
use serde::{Deserialize, Serialize};

/// Authorization roles recognised by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Back-office staff managing every project.
    Admin,
    /// External customer scoped to their own projects.
    Client,
}

impl Role {
    /// Parse a stored role value, rejecting anything outside the closed set.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Self::Admin),
            "client" => Some(Self::Client),
            _ => None,
        }
    }

    /// Storage representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Client => "client",
        }
    }

    /// Landing destination after a successful sign-in with this role.
    #[must_use]
    pub const fn destination(self) -> Destination {
        match self {
            Self::Admin => Destination::AdminHome,
            Self::Client => Destination::ClientHome,
        }
    }

    /// Sign-in entry point appropriate for routes guarded by this role.
    #[must_use]
    pub const fn entry(self) -> Destination {
        match self {
            Self::Admin => Destination::AdminSignIn,
            Self::Client => Destination::SignIn,
        }
    }
}

/// Outcome of a profile lookup for authorization purposes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleResolution {
    /// The profile row exists; its role may still be unassigned.
    Found(Profile),
    /// No row appeared within the retry budget. Callers treat this as
    /// insufficient authorization, not as a hard failure.
    NotFound,
}

/// Navigation targets the auth core can send the user to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// Neutral landing page.
    Home,
    /// General sign-in entry.
    SignIn,
    /// Administrative sign-in entry.
    AdminSignIn,
    /// Administrative dashboard.
    AdminHome,
    /// Client project portal.
    ClientHome,
}

/// Freshly resolved `(user, role)` pair trusted by route guards.
///
/// Derived and never persisted; recomputed whenever the session changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleBinding {
    /// User the role was resolved for.
    pub user_id: UserId,
    /// Resolved role.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::{Destination, Role};

    #[test]
    fn parse_accepts_only_the_closed_set() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("client"), Some(Role::Client));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn destinations_differ_per_role() {
        assert_eq!(Role::Admin.destination(), Destination::AdminHome);
        assert_eq!(Role::Client.destination(), Destination::ClientHome);
        assert_ne!(Role::Admin.entry(), Role::Client.entry());
    }
}
