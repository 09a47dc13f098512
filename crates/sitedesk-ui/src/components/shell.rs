//! Application chrome: header, navigation, content slot.

use crate::app::routes::Route;
use crate::core::theme::ThemeMode;
use crate::models::NavLabels;
use yew::prelude::*;
use yew_router::prelude::Link;

#[derive(Properties, PartialEq)]
pub(crate) struct AppShellProps {
    pub children: Children,
    pub theme: ThemeMode,
    pub on_toggle_theme: Callback<()>,
    pub nav: NavLabels,
    pub locale_selector: Html,
    pub signed_in: bool,
    pub on_sign_out: Callback<()>,
}

#[function_component(AppShell)]
pub(crate) fn app_shell(props: &AppShellProps) -> Html {
    let theme_label = match props.theme {
        ThemeMode::Light => "Light",
        ThemeMode::Dark => "Dark",
    };

    html! {
        <div class={classes!("app-shell", format!("theme-{}", props.theme.as_str()))}>
            <header class="topbar">
                <div class="brand">
                    <Link<Route> to={Route::Home}><strong>{"Sitedesk"}</strong></Link<Route>>
                </div>
                <nav>
                    <Link<Route> to={Route::Home}>{props.nav.home.clone()}</Link<Route>>
                    <Link<Route> to={Route::AdminHome}>{props.nav.admin.clone()}</Link<Route>>
                    <Link<Route> to={Route::ClientHome}>{props.nav.portal.clone()}</Link<Route>>
                </nav>
                <div class="controls">
                    {props.locale_selector.clone()}
                    <button class="ghost" onclick={props.on_toggle_theme.clone()}>{theme_label}</button>
                    {if props.signed_in {
                        html! {
                            <button class="ghost" onclick={{
                                let on_sign_out = props.on_sign_out.clone();
                                Callback::from(move |_| on_sign_out.emit(()))
                            }}>{props.nav.sign_out.clone()}</button>
                        }
                    } else { html!{} }}
                </div>
            </header>
            <main class="content">
                {for props.children.iter()}
            </main>
        </div>
    }
}
