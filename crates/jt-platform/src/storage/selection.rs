//! Key-value backend selection.
//!
//! The backend is chosen once at startup from `storage.backend`.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use jt_core::config::StorageBackendKind;
use jt_core::ports::KeyValueStorePort;
use jt_infra::{FileKeyValueStore, MemoryKeyValueStore};

use super::web_storage::WebStorageKeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageFactoryError {
    #[error("{kind} storage is not supported on this target")]
    Unsupported { kind: StorageBackendKind },

    #[error("failed to initialize file-based storage: {0}")]
    FileBasedInit(#[from] std::io::Error),
}

/// Build the configured backend. File storage lives under
/// `<app_data_root>/kv`.
pub fn create_key_value_store(
    kind: StorageBackendKind,
    app_data_root: &Path,
) -> Result<Arc<dyn KeyValueStorePort>, StorageFactoryError> {
    match kind {
        StorageBackendKind::Web => {
            if cfg!(not(target_arch = "wasm32")) {
                warn!("Browser storage selected on a native target; bookmarks will stay in memory");
            }
            Ok(Arc::new(WebStorageKeyValueStore::new()))
        }
        StorageBackendKind::Secure => secure_store(),
        StorageBackendKind::File => {
            let store = FileKeyValueStore::new_in_app_data_root(app_data_root);
            std::fs::create_dir_all(store.base_dir())?;
            info!(dir = %store.base_dir().display(), "Using file-based key-value storage");
            Ok(Arc::new(store))
        }
        StorageBackendKind::Memory => {
            warn!("Using in-memory storage; bookmarks are lost on exit");
            Ok(Arc::new(MemoryKeyValueStore::new()))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn secure_store() -> Result<Arc<dyn KeyValueStorePort>, StorageFactoryError> {
    info!("Using system keychain for key-value storage");
    Ok(Arc::new(super::SecureKeyValueStore::new()))
}

#[cfg(target_arch = "wasm32")]
fn secure_store() -> Result<Arc<dyn KeyValueStorePort>, StorageFactoryError> {
    Err(StorageFactoryError::Unsupported {
        kind: StorageBackendKind::Secure,
    })
}
