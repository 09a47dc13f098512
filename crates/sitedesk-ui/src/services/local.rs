//! Wholesale wipes of browser-held state.

use async_trait::async_trait;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;
use js_sys::Array;
use sitedesk_identity::gateway::LocalState;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Clears the app's local storage and response caches.
pub(crate) struct BrowserLocalState;

#[async_trait(?Send)]
impl LocalState for BrowserLocalState {
    async fn clear_persistent(&self) -> anyhow::Result<()> {
        LocalStorage::clear();
        Ok(())
    }

    async fn clear_response_cache(&self) -> anyhow::Result<()> {
        // No cache area (insecure context, older browser) means nothing to wipe.
        let Ok(caches) = window().caches() else {
            return Ok(());
        };
        let keys = JsFuture::from(caches.keys()).await.map_err(js_error)?;
        for name in Array::from(&keys).iter() {
            if let Some(name) = name.as_string() {
                JsFuture::from(caches.delete(&name)).await.map_err(js_error)?;
            }
        }
        Ok(())
    }
}

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow::anyhow!(format!("{value:?}"))
}
