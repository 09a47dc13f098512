//! Role resolution with bounded retry over the eventual-consistency gap.

use crate::error::StoreError;
use crate::gateway::{Delay, ProfileStore};
use crate::profile::UserId;
use crate::role::RoleResolution;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Attempts made against a missing profile row before giving up.
pub const ROLE_LOOKUP_ATTEMPTS: u32 = 3;

/// Fixed pause between attempts, sized to absorb the replication lag between
/// provider sign-up and profile-row creation.
pub const ROLE_LOOKUP_BACKOFF: Duration = Duration::from_secs(1);

/// Resolves a user's authorization profile.
///
/// Only the empty-result race retries; store failures propagate immediately.
/// The loop is bounded by [`ROLE_LOOKUP_ATTEMPTS`], so worst-case latency is
/// the attempt budget times [`ROLE_LOOKUP_BACKOFF`].
pub struct RoleResolver<P, D> {
    profiles: Rc<P>,
    delay: Rc<D>,
}

impl<P, D> RoleResolver<P, D>
where
    P: ProfileStore,
    D: Delay,
{
    /// Build a resolver over the profile store and backoff seams.
    pub fn new(profiles: Rc<P>, delay: Rc<D>) -> Self {
        Self { profiles, delay }
    }

    /// Query the profile row, waiting out replication lag up to the budget.
    ///
    /// # Errors
    ///
    /// Returns the store failure unchanged when the query itself errors.
    pub async fn resolve(&self, user_id: UserId) -> Result<RoleResolution, StoreError> {
        for attempt in 1..=ROLE_LOOKUP_ATTEMPTS {
            if let Some(profile) = self.profiles.fetch_profile(user_id).await? {
                return Ok(RoleResolution::Found(profile));
            }
            if attempt < ROLE_LOOKUP_ATTEMPTS {
                debug!(attempt, "profile row absent, backing off");
                self.delay.wait(ROLE_LOOKUP_BACKOFF).await;
            }
        }
        Ok(RoleResolution::NotFound)
    }
}

impl<P, D> Clone for RoleResolver<P, D> {
    fn clone(&self) -> Self {
        Self {
            profiles: Rc::clone(&self.profiles),
            delay: Rc::clone(&self.delay),
        }
    }
}

