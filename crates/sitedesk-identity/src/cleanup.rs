//! Idempotent destruction of local session traces.

use crate::gateway::{IdentityGateway, LocalState};
use std::rc::Rc;
use tracing::warn;

/// Destroys any local trace of a session: provider sign-out, persisted
/// key-value state, and the response cache.
///
/// Safe to call speculatively, including when no session exists. Whatever
/// fails, the caller is left in the same logged-out local state.
pub struct SessionCleaner<G, L> {
    gateway: Rc<G>,
    local: Rc<L>,
}

impl<G, L> SessionCleaner<G, L>
where
    G: IdentityGateway,
    L: LocalState,
{
    /// Build a cleaner over the provider and local-state seams.
    pub fn new(gateway: Rc<G>, local: Rc<L>) -> Self {
        Self { gateway, local }
    }

    /// Best-effort cleanup; never raises. Each step runs regardless of
    /// earlier failures.
    pub async fn cleanup(&self) {
        match self.gateway.current_session().await {
            Ok(Some(_)) => {
                if let Err(err) = self.gateway.sign_out().await {
                    warn!("provider sign-out failed during cleanup: {err}");
                }
            }
            Ok(None) => {}
            Err(err) => warn!("session lookup failed during cleanup: {err}"),
        }
        if let Err(err) = self.local.clear_persistent().await {
            warn!("local storage wipe failed: {err}");
        }
        if let Err(err) = self.local.clear_response_cache().await {
            warn!("response cache wipe failed: {err}");
        }
    }
}

impl<G, L> Clone for SessionCleaner<G, L> {
    fn clone(&self) -> Self {
        Self {
            gateway: Rc::clone(&self.gateway),
            local: Rc::clone(&self.local),
        }
    }
}

