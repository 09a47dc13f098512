//! Role-gated route wrapper.
//!
//! # Design
//! - Re-derives the (user, role) binding from the provider on mount and on
//!   every auth event; flags owned by other consumers are never trusted.
//! - A generation counter discards evaluations superseded by newer events,
//!   so a stale binding is never rendered.
//! - Children stay hidden behind a loading indicator until a binding
//!   definitively matches.

use crate::app::provider::ProviderCtx;
use crate::app::routes::{Route, route_for};
use crate::core::guard::{GuardOutcome, decide, entry_redirect};
use crate::core::store::{AppStore, push_toast};
use crate::features::auth::controller::TimerDelay;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use crate::models::ToastKind;
use sitedesk_identity::events::AuthChange;
use sitedesk_identity::gateway::IdentityGateway;
use sitedesk_identity::resolver::RoleResolver;
use sitedesk_identity::role::{Destination, Role};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::Dispatch;

#[derive(Properties, PartialEq)]
pub(crate) struct RouteGuardProps {
    /// Role required to view the wrapped content.
    pub required: Role,
    /// Content rendered once the binding matches.
    pub children: Children,
}

/// Blocks role-restricted content until a fresh role binding matches.
#[function_component(RouteGuard)]
pub(crate) fn route_guard(props: &RouteGuardProps) -> Html {
    let ctx = use_context::<ProviderCtx>().expect("provider context missing");
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let outcome = use_state(|| None as Option<GuardOutcome>);
    let generation = use_mut_ref(|| 0u64);
    let dispatch = Dispatch::<AppStore>::new();

    {
        let outcome = outcome.clone();
        let generation = generation.clone();
        let ctx = ctx.clone();
        let dispatch = dispatch.clone();
        let denied_message = bundle.text("toast.denied", "");
        use_effect_with_deps(
            move |required| {
                let required = *required;
                let subscribe_ctx = ctx.clone();
                let evaluate = Rc::new(move || {
                    let current = {
                        let mut slot = generation.borrow_mut();
                        *slot += 1;
                        *slot
                    };
                    outcome.set(None);
                    let outcome = outcome.clone();
                    let generation = generation.clone();
                    let ctx = ctx.clone();
                    let dispatch = dispatch.clone();
                    let denied_message = denied_message.clone();
                    yew::platform::spawn_local(async move {
                        let next = evaluate_guard(&ctx, required).await;
                        if *generation.borrow() != current {
                            return;
                        }
                        if matches!(next, GuardOutcome::RedirectDenied(_)) {
                            dispatch.reduce_mut(|store| {
                                push_toast(&mut store.toasts, ToastKind::Error, denied_message);
                            });
                        }
                        outcome.set(Some(next));
                    });
                });
                evaluate();
                let on_change = {
                    let evaluate = Rc::clone(&evaluate);
                    Callback::from(move |_change: AuthChange| evaluate())
                };
                let subscription = subscribe_ctx.client.subscribe(on_change);
                move || subscription.dispose()
            },
            props.required,
        );
    }

    match *outcome {
        None => html! {
            <div class="guard-loading" aria-busy="true">
                <span class="spinner" />
                <p class="muted">{bundle.text("guard.loading", "")}</p>
            </div>
        },
        Some(GuardOutcome::Render(_)) => html! { <>{for props.children.iter()}</> },
        Some(
            GuardOutcome::RedirectToEntry(destination) | GuardOutcome::RedirectDenied(destination),
        ) => html! { <Redirect<Route> to={route_for(destination)} /> },
    }
}

/// Re-derive the binding from the provider's current truth.
async fn evaluate_guard(ctx: &ProviderCtx, required: Role) -> GuardOutcome {
    let user = match ctx.client.current_user().await {
        Ok(Some(user)) => user,
        // No session, or one the provider no longer honours.
        Ok(None) | Err(_) => return entry_redirect(required),
    };
    let resolver = RoleResolver::new(Rc::clone(&ctx.profiles), Rc::new(TimerDelay));
    match resolver.resolve(user.id).await {
        Ok(resolution) => decide(required, user.id, &resolution),
        Err(_) => GuardOutcome::RedirectDenied(Destination::Home),
    }
}
