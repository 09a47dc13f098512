//! Fake collaborators for the identity trait seams.
//!
//! Everything is scripted through interior mutability so tests can assert on
//! call order after moving the mock into the component under test.

use crate::fixtures;
use async_trait::async_trait;
use sitedesk_identity::error::{ProviderError, StoreError};
use sitedesk_identity::gateway::{Delay, IdentityGateway, LocalState, Navigator, ProfileStore};
use sitedesk_identity::profile::{Profile, UserId};
use sitedesk_identity::role::Destination;
use sitedesk_identity::session::{Session, UserIdentity};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

/// Provider calls recorded by [`FakeGateway`], in invocation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    /// `current_session` lookup.
    CurrentSession,
    /// `current_user` lookup.
    CurrentUser,
    /// Password sign-in attempt.
    SignIn {
        /// Email the attempt was made with.
        email: String,
    },
    /// Account registration.
    SignUp {
        /// Email the account was registered with.
        email: String,
    },
    /// Session destruction.
    SignOut,
    /// Credential change.
    UpdateCredential,
    /// Recovery email request.
    SendRecoveryEmail {
        /// Email the recovery was requested for.
        email: String,
    },
}

/// Scripted identity provider.
#[derive(Default)]
pub struct FakeGateway {
    /// Session returned by `current_session`.
    pub session: RefCell<Option<Session>>,
    /// User returned by `current_user`.
    pub user: RefCell<Option<UserIdentity>>,
    /// Forced failure for `sign_in_with_password`.
    pub sign_in_error: RefCell<Option<ProviderError>>,
    /// Forced failure for `sign_out`.
    pub sign_out_error: RefCell<Option<ProviderError>>,
    /// Forced failure for `update_credential`.
    pub update_error: RefCell<Option<ProviderError>>,
    /// Call log in invocation order.
    pub calls: RefCell<Vec<GatewayCall>>,
}

impl FakeGateway {
    /// Gateway holding a live session for the given user.
    #[must_use]
    pub fn signed_in(user: UserIdentity) -> Self {
        let gateway = Self::default();
        *gateway.session.borrow_mut() = Some(fixtures::session_for(user.clone()));
        *gateway.user.borrow_mut() = Some(user);
        gateway
    }

    fn record(&self, call: GatewayCall) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl IdentityGateway for FakeGateway {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        self.record(GatewayCall::CurrentSession);
        Ok(self.session.borrow().clone())
    }

    async fn current_user(&self) -> Result<Option<UserIdentity>, ProviderError> {
        self.record(GatewayCall::CurrentUser);
        Ok(self.user.borrow().clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<Session, ProviderError> {
        self.record(GatewayCall::SignIn {
            email: email.to_string(),
        });
        if let Some(err) = self.sign_in_error.borrow().clone() {
            return Err(err);
        }
        if let Some(session) = self.session.borrow().clone() {
            return Ok(session);
        }
        self.user.borrow().clone().map_or_else(
            || Err(ProviderError::new(None, "no scripted session")),
            |user| Ok(fixtures::session_for(user)),
        )
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<UserIdentity, ProviderError> {
        self.record(GatewayCall::SignUp {
            email: email.to_string(),
        });
        Ok(UserIdentity {
            id: Uuid::new_v4(),
            email: email.to_string(),
        })
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.record(GatewayCall::SignOut);
        self.session.borrow_mut().take();
        self.user.borrow_mut().take();
        match self.sign_out_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn update_credential(&self, _new_password: &str) -> Result<(), ProviderError> {
        self.record(GatewayCall::UpdateCredential);
        match self.update_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn send_recovery_email(&self, email: &str) -> Result<(), ProviderError> {
        self.record(GatewayCall::SendRecoveryEmail {
            email: email.to_string(),
        });
        Ok(())
    }
}

/// Profile store with per-call scripted outcomes.
///
/// Fetches consume the script front-first, then fall back to the persistent
/// row. Latch writes keep the fallback row in sync so re-reads observe them.
#[derive(Default)]
pub struct ScriptedProfiles {
    /// Outcomes consumed by `fetch_profile`, front first.
    pub fetch_script: RefCell<VecDeque<Result<Option<Profile>, StoreError>>>,
    /// Persistent row returned once the script is exhausted.
    pub fallback: RefCell<Option<Profile>>,
    /// Latch writes observed, in order.
    pub latch_writes: RefCell<Vec<(UserId, bool)>>,
    /// Forced failure for latch writes.
    pub latch_error: RefCell<Option<StoreError>>,
}

impl ScriptedProfiles {
    /// Store that always answers with the given row.
    #[must_use]
    pub fn always(profile: Option<Profile>) -> Self {
        let store = Self::default();
        *store.fallback.borrow_mut() = profile;
        store
    }

    /// Queue one fetch outcome ahead of the fallback.
    pub fn push_fetch(&self, outcome: Result<Option<Profile>, StoreError>) {
        self.fetch_script.borrow_mut().push_back(outcome);
    }
}

#[async_trait(?Send)]
impl ProfileStore for ScriptedProfiles {
    async fn fetch_profile(&self, _user_id: UserId) -> Result<Option<Profile>, StoreError> {
        if let Some(outcome) = self.fetch_script.borrow_mut().pop_front() {
            return outcome;
        }
        Ok(self.fallback.borrow().clone())
    }

    async fn set_reset_latch(&self, user_id: UserId, value: bool) -> Result<(), StoreError> {
        if let Some(err) = self.latch_error.borrow().clone() {
            return Err(err);
        }
        self.latch_writes.borrow_mut().push((user_id, value));
        if let Some(profile) = self.fallback.borrow_mut().as_mut() {
            profile.password_reset_in_progress = value;
        }
        Ok(())
    }
}

/// Local-state wiper backed by flags.
#[derive(Default)]
pub struct MemoryLocalState {
    /// Whether persisted key-value state is currently clear.
    pub storage_cleared: Cell<bool>,
    /// Whether the response cache is currently clear.
    pub cache_cleared: Cell<bool>,
    /// Number of full wipe passes.
    pub wipes: Cell<u32>,
}

#[async_trait(?Send)]
impl LocalState for MemoryLocalState {
    async fn clear_persistent(&self) -> anyhow::Result<()> {
        self.storage_cleared.set(true);
        self.wipes.set(self.wipes.get() + 1);
        Ok(())
    }

    async fn clear_response_cache(&self) -> anyhow::Result<()> {
        self.cache_cleared.set(true);
        Ok(())
    }
}

/// Records navigations without a router.
#[derive(Default)]
pub struct RecordingNavigator {
    /// Destinations visited, in order. Shared so clones observe each other.
    pub visits: Rc<RefCell<Vec<Destination>>>,
}

impl Clone for RecordingNavigator {
    fn clone(&self) -> Self {
        Self {
            visits: Rc::clone(&self.visits),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        self.visits.borrow_mut().push(destination);
    }
}

/// Instant delay that records every requested wait.
#[derive(Default)]
pub struct RecordingDelay {
    /// Requested durations, in order.
    pub waits: RefCell<Vec<Duration>>,
}

#[async_trait(?Send)]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.borrow_mut().push(duration);
    }
}
