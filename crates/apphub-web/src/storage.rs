//! `window.localStorage` backed [`KeyValueStore`].

use apphub_identity::{KeyValueStore, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use crate::util::js_error_message;

/// Origin-scoped persistent storage.
///
/// When `localStorage` is unavailable (disabled, sandboxed iframe) reads
/// return `None` and writes fail with [`StorageError::Unavailable`].
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    /// Bind to `window.localStorage`.
    pub fn new() -> Self {
        Self {
            storage: web_sys::window().and_then(|w| w.local_storage().ok().flatten()),
        }
    }

    /// Whether the browser granted access to storage.
    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| storage_error(&e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| storage_error(&e))
    }
}

fn storage_error(value: &JsValue) -> StorageError {
    match value.dyn_ref::<DomException>() {
        Some(dom) if dom.name() == "QuotaExceededError" => StorageError::QuotaExceeded,
        Some(dom) => StorageError::Other(dom.message()),
        None => StorageError::Other(js_error_message(value)),
    }
}
