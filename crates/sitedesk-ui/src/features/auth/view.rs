//! Sign-in and update-password screens driven by the reconciler state.
//!
//! # Design
//! - Forms submit through the provider and surface failures inline; the
//!   screen never closes itself on an error.
//! - The update form asks for the current password only outside recovery.
//! - Navigation after a successful sign-in belongs to the reconciler, not
//!   the form.

use crate::app::provider::ProviderCtx;
use crate::app::routes::Route;
use crate::core::store::{AppStore, push_toast};
use crate::features::auth::state::notice_key;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use crate::models::ToastKind;
use gloo::utils::window;
use sitedesk_identity::gateway::IdentityGateway;
use sitedesk_identity::password::{PasswordUpdateError, PasswordUpdateFlow};
use sitedesk_identity::reconciler::AuthView;
use sitedesk_identity::recovery::{in_recovery, location_indicates_recovery};
use sitedesk_identity::role::Role;
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[derive(Properties, PartialEq)]
pub(crate) struct AuthScreenProps {
    /// Which role's entry point this screen fronts.
    pub entry: Role,
}

/// Auth surface switching between sign-in and update-password views.
#[function_component(AuthScreen)]
pub(crate) fn auth_screen(props: &AuthScreenProps) -> Html {
    let view = use_selector(|store: &AppStore| store.auth.view_state.view);
    match *view {
        AuthView::SignIn => html! { <SignInForm entry={props.entry} /> },
        AuthView::UpdatePassword => html! { <UpdatePasswordForm /> },
    }
}

#[derive(Properties, PartialEq)]
struct SignInFormProps {
    entry: Role,
}

#[function_component(SignInForm)]
fn sign_in_form(props: &SignInFormProps) -> Html {
    let ctx = use_context::<ProviderCtx>().expect("provider context missing");
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str| bundle.text(key, "");
    let email = use_state(String::new);
    let password = use_state(String::new);
    let busy = use_state(|| false);
    let form_error = use_state(|| None as Option<String>);
    let recovery_sent = use_state(|| false);
    let slice_error = use_selector(|store: &AppStore| store.auth.view_state.error.clone());
    let notice = use_selector(|store: &AppStore| store.auth.view_state.notice);

    let on_email = input_setter(&email);
    let on_password = input_setter(&password);

    let submit = {
        let ctx = ctx.clone();
        let email = email.clone();
        let password = password.clone();
        let busy = busy.clone();
        let form_error = form_error.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *busy {
                return;
            }
            busy.set(true);
            form_error.set(None);
            let client = Rc::clone(&ctx.client);
            let email_value = (*email).clone();
            let password_value = (*password).clone();
            let busy = busy.clone();
            let form_error = form_error.clone();
            yew::platform::spawn_local(async move {
                if let Err(err) = client
                    .sign_in_with_password(&email_value, &password_value)
                    .await
                {
                    form_error.set(Some(err.message));
                }
                busy.set(false);
            });
        })
    };

    let request_recovery = {
        let ctx = ctx.clone();
        let email = email.clone();
        let recovery_sent = recovery_sent.clone();
        let form_error = form_error.clone();
        Callback::from(move |_| {
            let client = Rc::clone(&ctx.client);
            let email_value = (*email).clone();
            let recovery_sent = recovery_sent.clone();
            let form_error = form_error.clone();
            yew::platform::spawn_local(async move {
                match client.send_recovery_email(&email_value).await {
                    Ok(()) => recovery_sent.set(true),
                    Err(err) => form_error.set(Some(err.message)),
                }
            });
        })
    };

    let title = match props.entry {
        Role::Admin => t("auth.admin_signin_title"),
        Role::Client => t("auth.signin_title"),
    };
    let error = (*form_error).clone().or_else(|| (*slice_error).clone());

    html! {
        <div class="auth-screen">
            <form class="card auth-card" onsubmit={submit}>
                <header>
                    <h2>{title}</h2>
                    <p class="muted">{t("auth.signin_body")}</p>
                </header>
                {if let Some(notice) = *notice {
                    html! { <p class="notice-text">{t(notice_key(notice))}</p> }
                } else { html!{} }}
                <label class="stack">
                    <span>{t("auth.email_label")}</span>
                    <input
                        type="email"
                        placeholder={t("auth.email_placeholder")}
                        value={(*email).clone()}
                        oninput={on_email} />
                </label>
                <label class="stack">
                    <span>{t("auth.password_label")}</span>
                    <input
                        type="password"
                        value={(*password).clone()}
                        oninput={on_password} />
                </label>
                {if let Some(err) = &error {
                    html! { <p class="error-text">{err.clone()}</p> }
                } else { html! {} }}
                {if *recovery_sent {
                    html! { <p class="muted">{t("auth.recovery_sent")}</p> }
                } else { html! {} }}
                <div class="actions">
                    <button type="button" class="ghost" onclick={request_recovery}>
                        {t("auth.forgot")}
                    </button>
                    <button type="submit" class="solid" disabled={*busy}>
                        {if *busy { t("auth.submit_busy") } else { t("auth.submit") }}
                    </button>
                </div>
            </form>
        </div>
    }
}

/// New-credential form shown for recovery links and account settings.
#[function_component(UpdatePasswordForm)]
fn update_password_form() -> Html {
    let ctx = use_context::<ProviderCtx>().expect("provider context missing");
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str| bundle.text(key, "");
    let navigator = use_navigator().expect("router context missing");
    let dispatch = Dispatch::<AppStore>::new();
    let current = use_state(String::new);
    let new_password = use_state(String::new);
    let confirm = use_state(String::new);
    let busy = use_state(|| false);
    let form_error = use_state(|| None as Option<String>);
    let recovery_latch = use_selector(|store: &AppStore| store.auth.view_state.recovery_mode);

    // The gate re-derives from the URL on every render; the latch alone is
    // not trusted once the location changes.
    let location = window().location();
    let url_recovery = location_indicates_recovery(
        &location.search().unwrap_or_default(),
        &location.hash().unwrap_or_default(),
    );
    let recovery = in_recovery(url_recovery, *recovery_latch);

    let on_current = input_setter(&current);
    let on_new = input_setter(&new_password);
    let on_confirm = input_setter(&confirm);

    let submit = {
        let ctx = ctx.clone();
        let current = current.clone();
        let new_password = new_password.clone();
        let confirm = confirm.clone();
        let busy = busy.clone();
        let form_error = form_error.clone();
        let navigator = navigator.clone();
        let dispatch = dispatch.clone();
        let bundle = bundle.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *busy {
                return;
            }
            busy.set(true);
            form_error.set(None);
            let flow = PasswordUpdateFlow::new(
                Rc::clone(&ctx.client),
                Rc::clone(&ctx.profiles),
                Rc::clone(&ctx.local),
            );
            let current_value = (*current).clone();
            let new_value = (*new_password).clone();
            let confirm_value = (*confirm).clone();
            let busy = busy.clone();
            let form_error = form_error.clone();
            let current_state = current.clone();
            let new_state = new_password.clone();
            let confirm_state = confirm.clone();
            let navigator = navigator.clone();
            let dispatch = dispatch.clone();
            let bundle = bundle.clone();
            yew::platform::spawn_local(async move {
                match flow
                    .update(&current_value, &new_value, &confirm_value, recovery)
                    .await
                {
                    Ok(()) => {
                        current_state.set(String::new());
                        new_state.set(String::new());
                        confirm_state.set(String::new());
                    }
                    Err(PasswordUpdateError::SessionExpired) => {
                        dispatch.reduce_mut(|store| {
                            push_toast(
                                &mut store.toasts,
                                ToastKind::Error,
                                bundle.text("auth.notice_session_expired", ""),
                            );
                        });
                        navigator.push(&Route::SignIn);
                    }
                    Err(err) => form_error.set(Some(err.to_string())),
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="auth-screen">
            <form class="card auth-card" onsubmit={submit}>
                <header>
                    <h2>{t("auth.update_title")}</h2>
                    <p class="muted">{t("auth.update_body")}</p>
                </header>
                {if recovery { html! {} } else {
                    html! {
                        <label class="stack">
                            <span>{t("auth.current_label")}</span>
                            <input
                                type="password"
                                value={(*current).clone()}
                                oninput={on_current} />
                        </label>
                    }
                }}
                <label class="stack">
                    <span>{t("auth.new_label")}</span>
                    <input
                        type="password"
                        value={(*new_password).clone()}
                        oninput={on_new} />
                </label>
                <label class="stack">
                    <span>{t("auth.confirm_label")}</span>
                    <input
                        type="password"
                        value={(*confirm).clone()}
                        oninput={on_confirm} />
                </label>
                {if let Some(err) = &*form_error {
                    html! { <p class="error-text">{err.clone()}</p> }
                } else { html! {} }}
                <div class="actions">
                    <button type="submit" class="solid" disabled={*busy}>
                        {if *busy { t("auth.update_busy") } else { t("auth.update_submit") }}
                    </button>
                </div>
            </form>
        </div>
    }
}

fn input_setter(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
            state.set(input.value());
        }
    })
}
