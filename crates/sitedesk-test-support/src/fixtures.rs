//! Canonical identities, sessions, and profiles for test suites.

use chrono::{Duration, Utc};
use sitedesk_identity::profile::{Profile, UserId};
use sitedesk_identity::role::Role;
use sitedesk_identity::session::{Session, UserIdentity};
use uuid::Uuid;

/// Fixed user id shared across suites.
#[must_use]
pub fn user_id() -> UserId {
    Uuid::from_u128(0x51de_5c00_0000_4000_8000_0000_0000_0001)
}

/// Canonical user identity for the fixed id.
#[must_use]
pub fn user() -> UserIdentity {
    UserIdentity {
        id: user_id(),
        email: "pm@sitedesk.test".to_string(),
    }
}

/// Unexpired session for the given user.
#[must_use]
pub fn session_for(user: UserIdentity) -> Session {
    Session {
        access_token: "fixture-access-token".to_string(),
        refresh_token: "fixture-refresh-token".to_string(),
        expires_at: Some(Utc::now() + Duration::hours(1)),
        user,
    }
}

/// Unexpired session for the canonical user.
#[must_use]
pub fn session() -> Session {
    session_for(user())
}

/// Profile with the admin role and a clear latch.
#[must_use]
pub fn admin_profile() -> Profile {
    Profile {
        user_id: user_id(),
        role: Some(Role::Admin),
        password_reset_in_progress: false,
    }
}

/// Profile with the client role and a clear latch.
#[must_use]
pub fn client_profile() -> Profile {
    Profile {
        user_id: user_id(),
        role: Some(Role::Client),
        password_reset_in_progress: false,
    }
}

/// Profile row that exists but has no role granted.
#[must_use]
pub fn unassigned_profile() -> Profile {
    Profile {
        user_id: user_id(),
        role: None,
        password_reset_in_progress: false,
    }
}

/// Client profile caught mid-recovery (latch set).
#[must_use]
pub fn recovering_profile() -> Profile {
    Profile {
        password_reset_in_progress: true,
        ..client_profile()
    }
}
