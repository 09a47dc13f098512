//! Error types for the provider and data-store boundaries.

use thiserror::Error;

/// Classified provider failure kinds used for branching.
///
/// Classification is by the provider's machine-checkable message substrings;
/// everything else is opaque and surfaced verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Session refresh failed because the refresh token is gone or revoked.
    RefreshTokenMissing,
    /// Credential update rejected: the new password equals the current one.
    SamePassword,
    /// Any other provider failure.
    Other,
}

/// Failure reported by the identity provider.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    /// HTTP status when the failure came from a response.
    pub status: Option<u16>,
    /// Provider-supplied message.
    pub message: String,
}

impl ProviderError {
    /// Build an error from a provider message.
    #[must_use]
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Classify the failure by its message substrings.
    #[must_use]
    pub fn kind(&self) -> ProviderErrorKind {
        let lowered = self.message.to_ascii_lowercase();
        if lowered.contains("refresh token not found") {
            ProviderErrorKind::RefreshTokenMissing
        } else if lowered.contains("same password") {
            ProviderErrorKind::SamePassword
        } else {
            ProviderErrorKind::Other
        }
    }
}

/// Failure reported by the data store.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Transport-level failure reaching the store.
    #[error("profile store unreachable: {0}")]
    Transport(String),
    /// The store rejected the query or update.
    #[error("profile store rejected the request: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::{ProviderError, ProviderErrorKind};

    #[test]
    fn classification_uses_message_substrings() {
        let missing = ProviderError::new(Some(400), "Invalid token: Refresh Token Not Found");
        assert_eq!(missing.kind(), ProviderErrorKind::RefreshTokenMissing);

        let same = ProviderError::new(
            Some(422),
            "New password should be different from the same password used before",
        );
        assert_eq!(same.kind(), ProviderErrorKind::SamePassword);

        let other = ProviderError::new(Some(500), "upstream unavailable");
        assert_eq!(other.kind(), ProviderErrorKind::Other);
    }
}
