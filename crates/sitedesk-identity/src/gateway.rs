//! Trait seams for the provider, data store, and browser collaborators.
//!
//! # Design
//! - All async seams are `?Send`: the client runs on a single-threaded
//!   browser event loop and holds `Rc` state.
//! - Typed errors where callers branch on the failure; `anyhow` where the
//!   operation is best-effort and only ever logged.

use crate::error::{ProviderError, StoreError};
use crate::profile::{Profile, UserId};
use crate::role::Destination;
use crate::session::{Session, UserIdentity};
use async_trait::async_trait;
use std::time::Duration;

/// Identity provider operations consumed by the auth core.
#[async_trait(?Send)]
pub trait IdentityGateway {
    /// Session currently held for this tab, if any.
    async fn current_session(&self) -> Result<Option<Session>, ProviderError>;

    /// Re-validate the held session against the provider and return its user.
    async fn current_user(&self) -> Result<Option<UserIdentity>, ProviderError>;

    /// Exchange credentials for a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError>;

    /// Register a new account.
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, ProviderError>;

    /// Destroy the provider session.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Change the signed-in user's credential.
    async fn update_credential(&self, new_password: &str) -> Result<(), ProviderError>;

    /// Ask the provider to send a password-recovery email.
    async fn send_recovery_email(&self, email: &str) -> Result<(), ProviderError>;
}

/// Reads and writes against the `profiles` table.
#[async_trait(?Send)]
pub trait ProfileStore {
    /// Fetch the profile row for a user; `Ok(None)` when no row exists yet.
    async fn fetch_profile(&self, user_id: UserId) -> Result<Option<Profile>, StoreError>;

    /// Set the password-reset latch on a user's profile.
    async fn set_reset_latch(&self, user_id: UserId, value: bool) -> Result<(), StoreError>;
}

/// Browser-held state the session cleaner wipes wholesale.
#[async_trait(?Send)]
pub trait LocalState {
    /// Clear every persisted key-value entry the app owns.
    async fn clear_persistent(&self) -> anyhow::Result<()>;

    /// Clear the local response-cache area, when one exists.
    async fn clear_response_cache(&self) -> anyhow::Result<()>;
}

/// Navigation sink for the auth core's redirects.
pub trait Navigator {
    /// Send the user to a destination route.
    fn navigate(&self, destination: Destination);
}

/// Backoff primitive, kept behind a seam so retry loops run instantly in
/// tests while still suspending on the browser event loop in production.
#[async_trait(?Send)]
pub trait Delay {
    /// Suspend for the given duration.
    async fn wait(&self, duration: Duration);
}
