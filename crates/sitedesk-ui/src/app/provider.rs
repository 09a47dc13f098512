//! Provider context for sharing singleton service clients.
//!
//! # Design
//! - Create exactly one provider client per app boot so every subscriber
//!   shares the same event hub and session.
//! - Hand out `Rc` clones; equality is pointer identity.

use crate::services::local::BrowserLocalState;
use crate::services::profiles::RestProfileStore;
use crate::services::provider::ProviderClient;
use std::rc::Rc;

/// Shared service clients for the auth core.
#[derive(Clone)]
pub(crate) struct ProviderCtx {
    /// Singleton provider client.
    pub client: Rc<ProviderClient>,
    /// Profile store bound to the same client.
    pub profiles: Rc<RestProfileStore>,
    /// Browser local-state wiper.
    pub local: Rc<BrowserLocalState>,
}

impl ProviderCtx {
    /// Create the context with a fresh client.
    pub(crate) fn new() -> Self {
        let client = Rc::new(ProviderClient::new());
        let profiles = Rc::new(RestProfileStore::new(Rc::clone(&client)));
        Self {
            client,
            profiles,
            local: Rc::new(BrowserLocalState),
        }
    }
}

impl PartialEq for ProviderCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}
