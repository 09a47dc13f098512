//! The auth event state machine: view state, navigation, session hygiene.
//!
//! # Design
//! - Events are handled one at a time; callers queue deliveries and await
//!   each [`Reconciler::handle`] to completion before dequeuing the next.
//! - Truth is re-derived from the provider and the data store on every
//!   event; flags owned by other consumers are never trusted.
//! - A session the app cannot bind to a role is torn down, never kept in an
//!   ambiguous "authenticated but unverified" condition.

use crate::cleanup::SessionCleaner;
use crate::events::{AuthChange, AuthEvent};
use crate::gateway::{Delay, IdentityGateway, LocalState, Navigator, ProfileStore};
use crate::profile::UserId;
use crate::resolver::RoleResolver;
use crate::role::{Destination, RoleResolution};
use crate::session::Session;
use std::rc::Rc;
use tracing::{debug, warn};

/// Shown when sign-in succeeds at the provider but no profile row appears.
pub const NO_PROFILE_MESSAGE: &str = "Your account is not provisioned for this dashboard yet.";

/// Shown when a profile exists but carries no role assignment.
pub const NO_ROLE_MESSAGE: &str = "Your account has no dashboard access assigned.";

/// Views the auth screen can present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthView {
    /// Email/password form.
    #[default]
    SignIn,
    /// New-credential form shown during recovery.
    UpdatePassword,
}

/// User-visible notices surfaced by the auth flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthNotice {
    /// Recovery finished; the user should sign in with the new credential.
    PasswordUpdated,
    /// The session expired mid-flow; the user must sign in again.
    SessionExpired,
}

/// Local, process-lifetime view state driven by provider events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthViewState {
    /// Active auth view.
    pub view: AuthView,
    /// Set between `PASSWORD_RECOVERY` and its confirmed `USER_UPDATED`.
    pub recovery_mode: bool,
    /// Set once a recovery update has been confirmed.
    pub password_updated: bool,
    /// Latest user-visible failure.
    pub error: Option<String>,
    /// Latest user-visible success notice.
    pub notice: Option<AuthNotice>,
}

impl AuthViewState {
    /// Reset to the signed-out baseline. The notice survives so the
    /// post-recovery message outlives the sign-out that cleanup triggers.
    fn reset(&mut self) {
        let notice = self.notice.take();
        *self = Self {
            notice,
            ..Self::default()
        };
    }
}

/// Drives view-state and navigation decisions off the provider event stream.
pub struct Reconciler<G, P, L, N, D> {
    gateway: Rc<G>,
    profiles: Rc<P>,
    cleaner: SessionCleaner<G, L>,
    resolver: RoleResolver<P, D>,
    navigator: N,
    state: AuthViewState,
}

impl<G, P, L, N, D> Reconciler<G, P, L, N, D>
where
    G: IdentityGateway,
    P: ProfileStore,
    L: LocalState,
    N: Navigator,
    D: Delay,
{
    /// Build a reconciler over the collaborator seams.
    pub fn new(gateway: Rc<G>, profiles: Rc<P>, local: Rc<L>, navigator: N, delay: Rc<D>) -> Self {
        Self {
            cleaner: SessionCleaner::new(Rc::clone(&gateway), local),
            resolver: RoleResolver::new(Rc::clone(&profiles), delay),
            gateway,
            profiles,
            navigator,
            state: AuthViewState::default(),
        }
    }

    /// Current view-state snapshot.
    #[must_use]
    pub const fn state(&self) -> &AuthViewState {
        &self.state
    }

    /// Handle one provider event to completion.
    pub async fn handle(&mut self, change: AuthChange) {
        debug!(event = change.event.kind(), "auth event received");
        match change.event {
            AuthEvent::PasswordRecovery => self.on_password_recovery(change.session).await,
            AuthEvent::UserUpdated => self.on_user_updated(change.session).await,
            AuthEvent::SignedIn => self.on_signed_in(change.session).await,
            AuthEvent::SignedOut => self.on_signed_out().await,
            AuthEvent::TokenRefreshed => {}
        }
    }

    async fn on_password_recovery(&mut self, session: Option<Session>) {
        self.state.recovery_mode = true;
        self.state.view = AuthView::UpdatePassword;
        self.state.error = None;
        // Persisting the latch is best-effort; the view transition must not
        // wait on the data store.
        if let Some(user_id) = self.session_user(session).await {
            if let Err(err) = self.profiles.set_reset_latch(user_id, true).await {
                warn!("failed to persist reset latch: {err}");
            }
        }
    }

    async fn on_user_updated(&mut self, session: Option<Session>) {
        if !self.state.recovery_mode {
            return;
        }
        let Some(user_id) = self.session_user(session).await else {
            self.state.error = Some("could not confirm the password update".to_string());
            return;
        };
        match self.profiles.fetch_profile(user_id).await {
            Ok(Some(profile)) if profile.password_reset_in_progress => {
                match self.profiles.set_reset_latch(user_id, false).await {
                    Ok(()) => {
                        self.state.password_updated = true;
                        self.state.notice = Some(AuthNotice::PasswordUpdated);
                        self.cleaner.cleanup().await;
                        self.state.view = AuthView::SignIn;
                        self.navigator.navigate(Destination::SignIn);
                    }
                    Err(err) => {
                        self.state.error = Some(format!("could not finish the reset: {err}"));
                    }
                }
            }
            // Latch already clear: a replayed delivery. Nothing left to do.
            Ok(_) => {}
            Err(err) => {
                self.state.error = Some(format!("could not confirm the password update: {err}"));
            }
        }
    }

    async fn on_signed_in(&mut self, session: Option<Session>) {
        if self.state.recovery_mode || self.state.password_updated {
            // The recovery flow asserts a session of its own; following it
            // with a normal post-login redirect would break the flow.
            debug!("ignoring SIGNED_IN raised by the recovery flow");
            return;
        }
        let Some(user_id) = self.session_user(session).await else {
            self.state.error = Some("signed in without a resolvable user".to_string());
            self.cleaner.cleanup().await;
            return;
        };
        match self.resolver.resolve(user_id).await {
            Ok(RoleResolution::Found(profile)) => {
                if profile.password_reset_in_progress {
                    // A recovery window is still open for this user;
                    // re-enter it instead of navigating.
                    self.state.recovery_mode = true;
                    self.state.view = AuthView::UpdatePassword;
                    return;
                }
                match profile.role {
                    Some(role) => {
                        self.state.error = None;
                        self.state.notice = None;
                        self.navigator.navigate(role.destination());
                    }
                    None => {
                        self.state.error = Some(NO_ROLE_MESSAGE.to_string());
                        self.cleaner.cleanup().await;
                    }
                }
            }
            Ok(RoleResolution::NotFound) => {
                self.state.error = Some(NO_PROFILE_MESSAGE.to_string());
                self.cleaner.cleanup().await;
            }
            Err(err) => {
                self.state.error = Some(format!("account lookup failed: {err}"));
                self.cleaner.cleanup().await;
            }
        }
    }

    async fn on_signed_out(&mut self) {
        self.cleaner.cleanup().await;
        self.state.reset();
    }

    /// User id from the delivered session, falling back to the provider.
    async fn session_user(&self, session: Option<Session>) -> Option<UserId> {
        if let Some(session) = session {
            return Some(session.user.id);
        }
        match self.gateway.current_user().await {
            Ok(user) => user.map(|user| user.id),
            Err(err) => {
                warn!("current user lookup failed: {err}");
                None
            }
        }
    }
}

