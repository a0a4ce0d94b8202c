//! Token storage backed by the browser's `localStorage`

use turnstile_core::{StoreError, StoreKey, StoreResult, TokenStore};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Session fields kept in `localStorage`, one raw string per key
///
/// Survives reloads and is shared by every tab of the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> StoreResult<Storage> {
        let window = web_sys::window().ok_or_else(|| StoreError::unavailable("no window"))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::unavailable("localStorage is disabled"))
    }
}

impl TokenStore for LocalStorageStore {
    fn get(&self, key: StoreKey) -> StoreResult<Option<String>> {
        Self::storage()?.get_item(key.as_str()).map_err(js_error)
    }

    fn set(&self, key: StoreKey, value: &str) -> StoreResult<()> {
        Self::storage()?
            .set_item(key.as_str(), value)
            .map_err(js_error)
    }

    fn remove(&self, key: StoreKey) -> StoreResult<()> {
        Self::storage()?.remove_item(key.as_str()).map_err(js_error)
    }
}

fn js_error(err: JsValue) -> StoreError {
    StoreError::unavailable(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
