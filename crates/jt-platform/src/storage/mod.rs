#[cfg(not(target_arch = "wasm32"))]
mod secure_kv_store;
mod selection;
mod web_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use secure_kv_store::SecureKeyValueStore;
pub use selection::{create_key_value_store, StorageFactoryError};
pub use web_storage::WebStorageKeyValueStore;
