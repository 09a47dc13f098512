//! Auth lifecycle events delivered by the identity provider.

use crate::session::Session;
use serde::{Deserialize, Serialize};

/// Auth lifecycle events the provider emits to subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    /// A session was asserted (fresh sign-in or restored at boot).
    SignedIn,
    /// The session was destroyed.
    SignedOut,
    /// The user arrived through a password-recovery link.
    PasswordRecovery,
    /// The user record changed (credential update included).
    UserUpdated,
    /// The access token was silently refreshed.
    TokenRefreshed,
}

impl AuthEvent {
    /// Machine-friendly discriminator matching the provider's wire names.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::PasswordRecovery => "PASSWORD_RECOVERY",
            Self::UserUpdated => "USER_UPDATED",
            Self::TokenRefreshed => "TOKEN_REFRESHED",
        }
    }
}

/// Envelope delivered to subscribers: the event plus the provider's current
/// session, when one exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthChange {
    /// Event kind.
    pub event: AuthEvent,
    /// Session held at emission time.
    pub session: Option<Session>,
}

#[cfg(test)]
mod tests {
    use super::AuthEvent;

    #[test]
    fn kinds_match_the_provider_wire_names() {
        assert_eq!(AuthEvent::PasswordRecovery.kind(), "PASSWORD_RECOVERY");
        assert_eq!(AuthEvent::SignedIn.kind(), "SIGNED_IN");
        let encoded = serde_json::to_string(&AuthEvent::UserUpdated).expect("serialize event");
        assert_eq!(encoded, "\"USER_UPDATED\"");
    }
}
