//! Wires the provider event stream into the reconciler, one event at a time.
//!
//! # Design
//! - Deliveries enqueue; a single drain task awaits each handler to
//!   completion before dequeuing the next, preserving emission order.
//! - After every handled event the store slice is refreshed from the
//!   reconciler, and fresh errors are mirrored as toasts so they outlive
//!   the sign-out that cleanup itself can trigger.

use crate::app::provider::ProviderCtx;
use crate::app::routes::route_for;
use crate::core::store::{AppStore, push_toast};
use crate::features::auth::state::apply_view_state;
use crate::models::ToastKind;
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use sitedesk_identity::events::AuthChange;
use sitedesk_identity::gateway::{Delay, Navigator};
use sitedesk_identity::reconciler::{AuthViewState, Reconciler};
use sitedesk_identity::role::Destination;
use sitedesk_identity::session::UserIdentity;
use crate::services::local::BrowserLocalState;
use crate::services::profiles::RestProfileStore;
use crate::services::provider::{AuthSubscription, ProviderClient};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use yew::Callback;
use yewdux::prelude::Dispatch;

/// Routes reconciler navigation through the yew router.
pub(crate) struct RouterNavigator {
    inner: yew_router::navigator::Navigator,
}

impl RouterNavigator {
    /// Wrap a router navigator handle.
    pub(crate) const fn new(inner: yew_router::navigator::Navigator) -> Self {
        Self { inner }
    }
}

impl Navigator for RouterNavigator {
    fn navigate(&self, destination: Destination) {
        self.inner.push(&route_for(destination));
    }
}

/// Backoff primitive over the browser event loop.
pub(crate) struct TimerDelay;

#[async_trait(?Send)]
impl Delay for TimerDelay {
    async fn wait(&self, duration: Duration) {
        TimeoutFuture::new(u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)).await;
    }
}

type AppReconciler =
    Reconciler<ProviderClient, RestProfileStore, BrowserLocalState, RouterNavigator, TimerDelay>;

/// Handle owning the reconciler's provider subscription.
pub(crate) struct ReconcilerHandle {
    subscription: AuthSubscription,
}

impl ReconcilerHandle {
    /// Detach from the event stream.
    pub(crate) fn dispose(&self) {
        self.subscription.dispose();
    }
}

/// Subscribe a reconciler to the provider's event stream.
pub(crate) fn start_reconciler(
    ctx: &ProviderCtx,
    navigator: yew_router::navigator::Navigator,
    dispatch: Dispatch<AppStore>,
) -> ReconcilerHandle {
    let reconciler: Rc<RefCell<AppReconciler>> = Rc::new(RefCell::new(Reconciler::new(
        Rc::clone(&ctx.client),
        Rc::clone(&ctx.profiles),
        Rc::clone(&ctx.local),
        RouterNavigator::new(navigator),
        Rc::new(TimerDelay),
    )));
    let queue: Rc<RefCell<VecDeque<AuthChange>>> = Rc::new(RefCell::new(VecDeque::new()));
    let busy = Rc::new(Cell::new(false));

    let callback = Callback::from(move |change: AuthChange| {
        queue.borrow_mut().push_back(change);
        if busy.get() {
            return;
        }
        busy.set(true);
        let reconciler = Rc::clone(&reconciler);
        let queue = Rc::clone(&queue);
        let busy = Rc::clone(&busy);
        let dispatch = dispatch.clone();
        yew::platform::spawn_local(async move {
            loop {
                let next = queue.borrow_mut().pop_front();
                let Some(next) = next else { break };
                let user = next.session.as_ref().map(|session| session.user.clone());
                reconciler.borrow_mut().handle(next).await;
                let snapshot = reconciler.borrow().state().clone();
                sync_store(&dispatch, snapshot, user);
            }
            busy.set(false);
        });
    });

    ReconcilerHandle {
        subscription: ctx.client.subscribe(callback),
    }
}

/// Push the reconciler snapshot into the store, mirroring new errors as
/// toasts so the message survives a state reset.
fn sync_store(dispatch: &Dispatch<AppStore>, next: AuthViewState, user: Option<UserIdentity>) {
    dispatch.reduce_mut(|store| {
        if next.error.is_some() && next.error != store.auth.view_state.error {
            if let Some(message) = next.error.clone() {
                push_toast(&mut store.toasts, ToastKind::Error, message);
            }
        }
        apply_view_state(&mut store.auth, next, user);
    });
}
