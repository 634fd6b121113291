use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use jt_core::ports::{KeyValueStoreError, KeyValueStorePort};

const SERVICE_NAME: &str = "JobTrack";

/// System keychain-backed key-value store.
///
/// Keychain calls block, so each one runs on the blocking pool.
///
/// 基于系统钥匙串的键值存储实现。
#[derive(Debug, Clone, Default)]
pub struct SecureKeyValueStore;

impl SecureKeyValueStore {
    pub fn new() -> Self {
        Self
    }

    fn entry_for_key(key: &str) -> Result<Entry, KeyValueStoreError> {
        Entry::new(SERVICE_NAME, key)
            .map_err(|e| KeyValueStoreError::Other(format!("failed to create keyring entry: {e}")))
    }

    fn map_keyring_error(context: &str, err: keyring::Error) -> KeyValueStoreError {
        match err {
            keyring::Error::PlatformFailure(msg) => {
                KeyValueStoreError::PermissionDenied(msg.to_string())
            }
            keyring::Error::NoStorageAccess(msg) => KeyValueStoreError::Unavailable(msg.to_string()),
            keyring::Error::TooLong(attr, limit) => KeyValueStoreError::QuotaExceeded(format!(
                "{context}: {attr} exceeds {limit} bytes"
            )),
            _ => KeyValueStoreError::Other(format!("{context}: {err}")),
        }
    }

    async fn run_blocking<T, F>(op: F) -> Result<T, KeyValueStoreError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, KeyValueStoreError> + Send + 'static,
    {
        tokio::task::spawn_blocking(op)
            .await
            .map_err(|e| KeyValueStoreError::Other(format!("keyring task failed: {e}")))?
    }
}

#[async_trait]
impl KeyValueStorePort for SecureKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let key = key.to_string();
        Self::run_blocking(move || {
            let entry = Self::entry_for_key(&key)?;
            match entry.get_password() {
                Ok(value) => Ok(Some(value)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(err) => Err(Self::map_keyring_error("failed to read keychain", err)),
            }
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let key = key.to_string();
        let value = value.to_string();
        Self::run_blocking(move || {
            let entry = Self::entry_for_key(&key)?;
            entry
                .set_password(&value)
                .map_err(|err| Self::map_keyring_error("failed to write keychain", err))?;
            debug!(key = %key, bytes = value.len(), "Wrote keychain entry");
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let key = key.to_string();
        Self::run_blocking(move || {
            let entry = Self::entry_for_key(&key)?;
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(err) => Err(Self::map_keyring_error("failed to delete keychain entry", err)),
            }
        })
        .await
    }
}
