//! Persistence and environment helpers for the app shell.

use crate::core::theme::ThemeMode;
use crate::i18n::{DEFAULT_LOCALE, LocaleCode};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::{document, window};
use serde::Serialize;
use web_sys::Url;

pub(crate) const THEME_KEY: &str = "sitedesk.theme";
pub(crate) const LOCALE_KEY: &str = "sitedesk.locale";
pub(crate) const SESSION_KEY: &str = "sitedesk.auth.session";

pub(crate) fn load_theme() -> ThemeMode {
    if let Ok(value) = LocalStorage::get::<String>(THEME_KEY) {
        return match value.as_str() {
            "light" => ThemeMode::Light,
            _ => ThemeMode::Dark,
        };
    }
    ThemeMode::Dark
}

pub(crate) fn load_locale() -> LocaleCode {
    if let Ok(value) = LocalStorage::get::<String>(LOCALE_KEY) {
        if let Some(locale) = LocaleCode::from_lang_tag(&value) {
            return locale;
        }
    }
    if let Some(nav) = window().navigator().language() {
        if let Some(locale) = LocaleCode::from_lang_tag(&nav) {
            return locale;
        }
    }
    DEFAULT_LOCALE
}

/// Base URL of the managed auth/database provider.
///
/// Deployments pin it through a `<meta>` tag; development falls back to the
/// conventional local provider port on the current host.
pub(crate) fn provider_base_url() -> String {
    if let Some(url) = meta_content("sitedesk-provider-url") {
        return url.trim_end_matches('/').to_string();
    }

    let href = window()
        .location()
        .href()
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    if let Ok(url) = Url::new(&href) {
        return format!("{}//{}:54321", url.protocol(), url.hostname());
    }
    "http://localhost:54321".to_string()
}

/// Publishable API key attached to every provider request.
pub(crate) fn provider_publishable_key() -> String {
    meta_content("sitedesk-provider-key").unwrap_or_else(|| "sitedesk-dev".to_string())
}

fn meta_content(name: &str) -> Option<String> {
    document()
        .query_selector(&format!("meta[name='{name}']"))
        .ok()
        .flatten()
        .and_then(|element| element.get_attribute("content"))
        .filter(|value| !value.trim().is_empty())
}

pub(crate) fn set_storage<T: Serialize>(key: &'static str, value: T) {
    if let Err(err) = LocalStorage::set(key, value) {
        log_storage_error("set", key, &err.to_string());
    }
}

pub(crate) fn delete_storage(key: &'static str) {
    LocalStorage::delete(key);
}

fn log_storage_error(operation: &'static str, key: &'static str, detail: &str) {
    console::error!("storage operation failed", operation, key, detail);
}
