//! App shell wiring: routing, store, provider boot, auth reconciliation.

use crate::components::guard::RouteGuard;
use crate::components::shell::AppShell;
use crate::components::toast::ToastHost;
use crate::core::store::{AppStore, dismiss_toast, push_toast};
use crate::core::theme::ThemeMode;
use crate::features::auth::controller::{ReconcilerHandle, start_reconciler};
use crate::features::auth::view::AuthScreen;
use crate::i18n::{DEFAULT_LOCALE, LocaleCode, TranslationBundle};
use crate::models::{NavLabels, ToastKind};
use gloo::utils::window;
use preferences::{LOCALE_KEY, THEME_KEY, load_locale, load_theme, set_storage};
use provider::ProviderCtx;
use routes::Route;
use sitedesk_identity::cleanup::SessionCleaner;
use sitedesk_identity::gateway::IdentityGateway;
use sitedesk_identity::recovery::location_indicates_recovery;
use sitedesk_identity::role::Role;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

pub(crate) mod preferences;
pub(crate) mod provider;
pub(crate) mod routes;

#[function_component(SitedeskApp)]
pub(crate) fn sitedesk_app() -> Html {
    html! {
        <BrowserRouter>
            <AppRoot />
        </BrowserRouter>
    }
}

#[function_component(AppRoot)]
fn app_root() -> Html {
    let theme = use_state(load_theme);
    let locale = use_state(load_locale);
    let provider_ctx = use_memo(|_| ProviderCtx::new(), ());
    let dispatch = Dispatch::<AppStore>::new();
    let navigator = use_navigator().expect("router context missing");
    let reconciler = use_mut_ref(|| None as Option<ReconcilerHandle>);
    let bundle = {
        let locale = *locale;
        use_memo(move |_| TranslationBundle::new(locale), locale)
    };

    let toasts = use_selector(|store: &AppStore| store.toasts.items.clone());
    let signed_in = use_selector(|store: &AppStore| store.auth.user.is_some());

    {
        let theme = *theme;
        use_effect_with_deps(
            move |_| {
                apply_theme(theme);
                set_storage(THEME_KEY, theme.as_str());
                || ()
            },
            theme,
        );
    }
    {
        let locale = *locale;
        use_effect_with_deps(
            move |_| {
                set_storage(LOCALE_KEY, locale.code());
                || ()
            },
            locale,
        );
    }
    {
        // Subscribe the reconciler before boot so no event is missed, and
        // eagerly clean when the URL marks a recovery flow: a leftover
        // session from another user must not short-circuit the recovery view.
        let ctx = (*provider_ctx).clone();
        let dispatch = dispatch.clone();
        let navigator = navigator.clone();
        let reconciler = reconciler.clone();
        use_effect_with_deps(
            move |_| {
                *reconciler.borrow_mut() = Some(start_reconciler(&ctx, navigator, dispatch));
                let boot_ctx = ctx.clone();
                yew::platform::spawn_local(async move {
                    let location = window().location();
                    let search = location.search().unwrap_or_default();
                    let hash = location.hash().unwrap_or_default();
                    if location_indicates_recovery(&search, &hash) {
                        SessionCleaner::new(
                            Rc::clone(&boot_ctx.client),
                            Rc::clone(&boot_ctx.local),
                        )
                        .cleanup()
                        .await;
                    }
                    boot_ctx.client.boot().await;
                });
                move || {
                    if let Some(handle) = reconciler.borrow_mut().take() {
                        handle.dispose();
                    }
                }
            },
            (),
        );
    }

    let toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_| theme.set(theme.toggled()))
    };
    let on_dismiss = {
        let dispatch = dispatch.clone();
        Callback::from(move |id: u64| {
            dispatch.reduce_mut(|store| dismiss_toast(&mut store.toasts, id));
        })
    };
    let on_sign_out = {
        let ctx = (*provider_ctx).clone();
        let dispatch = dispatch.clone();
        let bundle = (*bundle).clone();
        Callback::from(move |()| {
            let client = Rc::clone(&ctx.client);
            let dispatch = dispatch.clone();
            let message = bundle.text("toast.sign_out_failed", "");
            yew::platform::spawn_local(async move {
                if client.sign_out().await.is_err() {
                    dispatch.reduce_mut(|store| {
                        push_toast(&mut store.toasts, ToastKind::Info, message);
                    });
                }
            });
        })
    };

    let nav_labels = NavLabels {
        home: bundle.text("nav.home", "Home"),
        admin: bundle.text("nav.admin", "Admin"),
        portal: bundle.text("nav.portal", "My projects"),
        sign_out: bundle.text("nav.sign_out", "Sign out"),
    };

    let locale_selector = {
        let locale = locale.clone();
        html! {
            <select value={locale.code().to_string()} onchange={{
                let locale = locale.clone();
                Callback::from(move |e: Event| {
                    if let Some(target) = e
                        .target()
                        .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
                    {
                        if let Some(next) = LocaleCode::from_lang_tag(&target.value()) {
                            locale.set(next);
                        }
                    }
                })
            }}>
                {for LocaleCode::all().iter().map(|lc| html! {
                    <option value={lc.code()} selected={*lc == *locale}>{lc.label()}</option>
                })}
            </select>
        }
    };

    let bundle_routes = bundle.clone();

    html! {
        <ContextProvider<ProviderCtx> context={(*provider_ctx).clone()}>
            <ContextProvider<TranslationBundle> context={(*bundle).clone()}>
                <AppShell
                    theme={*theme}
                    on_toggle_theme={toggle_theme}
                    nav={nav_labels}
                    locale_selector={locale_selector}
                    signed_in={*signed_in}
                    on_sign_out={on_sign_out}
                >
                    <Switch<Route> render={move |route| {
                        let bundle = (*bundle_routes).clone();
                        match route {
                            Route::Home => html! { <HomeGate /> },
                            Route::SignIn => html! { <AuthScreen entry={Role::Client} /> },
                            Route::AdminSignIn => html! { <AuthScreen entry={Role::Admin} /> },
                            Route::AdminHome => html! {
                                <RouteGuard required={Role::Admin}>
                                    <Placeholder
                                        title={bundle.text("placeholder.admin_title", "Project overview")}
                                        body={bundle.text("placeholder.admin_body", "")} />
                                </RouteGuard>
                            },
                            Route::ClientHome => html! {
                                <RouteGuard required={Role::Client}>
                                    <Placeholder
                                        title={bundle.text("placeholder.portal_title", "Your projects")}
                                        body={bundle.text("placeholder.portal_body", "")} />
                                </RouteGuard>
                            },
                            Route::NotFound => html! {
                                <Placeholder
                                    title={bundle.text("placeholder.not_found_title", "Not found")}
                                    body={bundle.text("placeholder.not_found_body", "")} />
                            },
                        }
                    }} />
                </AppShell>
                <ToastHost toasts={(*toasts).clone()} on_dismiss={on_dismiss} />
            </ContextProvider<TranslationBundle>>
        </ContextProvider<ProviderCtx>>
    }
}

/// Neutral landing that yields to the auth screen while a recovery flow is
/// mid-flight, so recovery links pointing at `/` still reach the form.
#[function_component(HomeGate)]
fn home_gate() -> Html {
    let view = use_selector(|store: &AppStore| store.auth.view_state.view);
    if *view == sitedesk_identity::reconciler::AuthView::UpdatePassword {
        html! { <AuthScreen entry={Role::Client} /> }
    } else {
        html! { <Landing /> }
    }
}

#[function_component(Landing)]
fn landing() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    html! {
        <div class="landing">
            <h2>{bundle.text("home.title", "Welcome")}</h2>
            <p class="muted">{bundle.text("home.body", "")}</p>
            <div class="actions">
                <Link<Route> classes="solid" to={Route::SignIn}>
                    {bundle.text("home.signin_cta", "Client sign in")}
                </Link<Route>>
                <Link<Route> classes="ghost" to={Route::AdminSignIn}>
                    {bundle.text("home.admin_cta", "Staff sign in")}
                </Link<Route>>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PlaceholderProps {
    pub title: String,
    pub body: String,
}

#[function_component(Placeholder)]
fn placeholder(props: &PlaceholderProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    html! {
        <div class="placeholder">
            <h2>{&props.title}</h2>
            <p class="muted">{&props.body}</p>
            <div class="pill subtle">{bundle.text("placeholder.badge", "")}</div>
        </div>
    }
}

fn apply_theme(theme: ThemeMode) {
    if let Some(document) = window().document() {
        if let Some(body) = document.body() {
            let _ = body.set_attribute("data-theme", theme.as_str());
        }
    }
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<SitedeskApp>::with_root(root).render();
    } else {
        yew::Renderer::<SitedeskApp>::new().render();
    }
}
