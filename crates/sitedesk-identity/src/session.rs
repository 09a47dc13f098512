//! Provider sessions and user identities held transiently by the client.

use crate::profile::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider user record, read-only to the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Provider-assigned identifier.
    pub id: UserId,
    /// Email the account was registered with.
    pub email: String,
}

/// Opaque token bundle issued by the identity provider.
///
/// Held only for the lifetime of a tab and never trusted without
/// revalidation against the provider when gating protected content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token attached to provider and data-store calls.
    pub access_token: String,
    /// Token used to mint a replacement session.
    pub refresh_token: String,
    /// Access-token expiry, when the provider reports one.
    pub expires_at: Option<DateTime<Utc>>,
    /// User the session was issued to.
    pub user: UserIdentity,
}

impl Session {
    /// Whether the access token is already past its expiry.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

