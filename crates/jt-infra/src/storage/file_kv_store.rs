use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use jt_core::ports::{KeyValueStoreError, KeyValueStorePort};

const VALUE_EXTENSION: &str = "kv";

/// File-backed key-value store: one file per key.
///
/// Used on native targets without a usable keychain, and in headless runs.
///
/// 基于文件的键值存储：每个 key 一个文件。
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Store rooted at `<app_data_root>/kv`.
    ///
    /// 在 `<app_data_root>/kv` 下创建存储。
    pub fn new_in_app_data_root(app_data_root: &Path) -> Self {
        Self::with_base_dir(app_data_root.join("kv"))
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{VALUE_EXTENSION}", encode_key(key)))
    }

    /// Write to a uniquely named sibling, then rename over the target.
    async fn atomic_write(&self, path: &Path, content: &str) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .with_context(|| format!("create kv dir failed: {}", self.base_dir.display()))?;

        let tmp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp value failed: {}", tmp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
                .await
                .with_context(|| format!("set value permissions failed: {}", tmp_path.display()))?;
        }

        if let Err(err) = fs::rename(&tmp_path, path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err).with_context(|| {
                format!(
                    "rename temp value to target failed: {} -> {}",
                    tmp_path.display(),
                    path.display()
                )
            });
        }
        Ok(())
    }
}

/// Percent-encode every byte outside `[A-Za-z0-9._-]`.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                encoded.push(char::from(byte))
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

fn map_error(err: anyhow::Error) -> KeyValueStoreError {
    let denied = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::PermissionDenied);
    if denied {
        KeyValueStoreError::PermissionDenied(format!("{err:#}"))
    } else {
        KeyValueStoreError::Other(format!("{err:#}"))
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let path = self.file_path(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_error(
                anyhow::Error::new(e).context(format!("read value failed: {}", path.display())),
            )),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let path = self.file_path(key);
        self.atomic_write(&path, value).await.map_err(map_error)?;
        debug!(key = %key, path = %path.display(), bytes = value.len(), "Wrote value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let path = self.file_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_error(
                anyhow::Error::new(e).context(format!("remove value failed: {}", path.display())),
            )),
        }
    }
}
