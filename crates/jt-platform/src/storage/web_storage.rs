//! `window.localStorage`-backed key-value store.
//!
//! Only functional in wasm32 builds. On native targets every call reports
//! `Unavailable`, which leaves the bookmark store running in memory.

use async_trait::async_trait;

use jt_core::ports::{KeyValueStoreError, KeyValueStorePort};

#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorageKeyValueStore;

impl WebStorageKeyValueStore {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Result<web_sys::Storage, KeyValueStoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| KeyValueStoreError::Unavailable("localStorage unavailable".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
fn map_js_error(context: &str, err: impl std::fmt::Debug) -> KeyValueStoreError {
    let text = format!("{err:?}");
    if text.contains("QuotaExceeded") {
        KeyValueStoreError::QuotaExceeded(format!("{context}: {text}"))
    } else if text.contains("SecurityError") {
        KeyValueStoreError::PermissionDenied(format!("{context}: {text}"))
    } else {
        KeyValueStoreError::Other(format!("{context}: {text}"))
    }
}

#[async_trait]
impl KeyValueStorePort for WebStorageKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .get_item(key)
                .map_err(|e| map_js_error("localStorage getItem failed", e))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Err(unavailable())
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| map_js_error("localStorage setItem failed", e))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Err(unavailable())
        }
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| map_js_error("localStorage removeItem failed", e))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Err(unavailable())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn unavailable() -> KeyValueStoreError {
    KeyValueStoreError::Unavailable("localStorage is only available in browser builds".to_string())
}
