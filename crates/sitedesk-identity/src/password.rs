//! Credential-change flow with ordered validation and provider error mapping.

use crate::cleanup::SessionCleaner;
use crate::error::ProviderErrorKind;
use crate::gateway::{IdentityGateway, LocalState, ProfileStore};
use std::rc::Rc;
use thiserror::Error;
use tracing::warn;

/// Minimum accepted credential length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Distinct failures the update flow reports to the form.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PasswordUpdateError {
    /// New password is shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    TooShort,
    /// Confirmation does not match the new password.
    #[error("passwords do not match")]
    Mismatch,
    /// Re-authentication with the current password failed.
    #[error("current password incorrect")]
    CurrentPasswordIncorrect,
    /// Provider rejected the update because nothing changed.
    #[error("new password must differ from the current password")]
    SamePassword,
    /// The session expired mid-flow; local state has been cleaned.
    #[error("session expired")]
    SessionExpired,
    /// Any other provider failure, surfaced verbatim.
    #[error("{0}")]
    Provider(String),
}

/// Validate a proposed credential pair before any provider call is made.
///
/// # Errors
///
/// Returns [`PasswordUpdateError::TooShort`] or
/// [`PasswordUpdateError::Mismatch`], in that order.
pub fn validate_new_password(new_password: &str, confirm: &str) -> Result<(), PasswordUpdateError> {
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordUpdateError::TooShort);
    }
    if new_password != confirm {
        return Err(PasswordUpdateError::Mismatch);
    }
    Ok(())
}

/// Changes the signed-in user's credential.
///
/// Verifies the current password by re-authenticating with the provider,
/// except while the recovery gate is open. Navigation stays with the caller;
/// the flow only guarantees local state is cleaned when the session is gone.
pub struct PasswordUpdateFlow<G, P, L> {
    gateway: Rc<G>,
    profiles: Rc<P>,
    cleaner: SessionCleaner<G, L>,
}

impl<G, P, L> PasswordUpdateFlow<G, P, L>
where
    G: IdentityGateway,
    P: ProfileStore,
    L: LocalState,
{
    /// Build the flow over the provider, profile-store, and local seams.
    pub fn new(gateway: Rc<G>, profiles: Rc<P>, local: Rc<L>) -> Self {
        Self {
            cleaner: SessionCleaner::new(Rc::clone(&gateway), local),
            gateway,
            profiles,
        }
    }

    /// Run the full update: validation, optional re-auth, provider update,
    /// and (in recovery mode) the latch write the pending `USER_UPDATED`
    /// handler will clear.
    ///
    /// # Errors
    ///
    /// Each validation and provider failure maps to a distinct
    /// [`PasswordUpdateError`]; the dialog stays open and reports it.
    pub async fn update(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
        in_recovery: bool,
    ) -> Result<(), PasswordUpdateError> {
        validate_new_password(new_password, confirm_password)?;

        let user = match self.gateway.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.cleaner.cleanup().await;
                return Err(PasswordUpdateError::SessionExpired);
            }
            Err(err) => {
                if err.kind() == ProviderErrorKind::RefreshTokenMissing {
                    self.cleaner.cleanup().await;
                    return Err(PasswordUpdateError::SessionExpired);
                }
                return Err(PasswordUpdateError::Provider(err.message));
            }
        };

        if !in_recovery
            && self
                .gateway
                .sign_in_with_password(&user.email, current_password)
                .await
                .is_err()
        {
            return Err(PasswordUpdateError::CurrentPasswordIncorrect);
        }

        if let Err(err) = self.gateway.update_credential(new_password).await {
            return Err(match err.kind() {
                ProviderErrorKind::SamePassword => PasswordUpdateError::SamePassword,
                ProviderErrorKind::RefreshTokenMissing => {
                    self.cleaner.cleanup().await;
                    PasswordUpdateError::SessionExpired
                }
                ProviderErrorKind::Other => PasswordUpdateError::Provider(err.message),
            });
        }

        if in_recovery {
            // Re-assert the latch so the pending USER_UPDATED handling has a
            // record to clear even if the recovery event's write was lost.
            if let Err(err) = self.profiles.set_reset_latch(user.id, true).await {
                warn!("failed to mark reset latch after recovery update: {err}");
            }
        }
        Ok(())
    }
}

