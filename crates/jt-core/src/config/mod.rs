//! # Configuration DTOs / 配置数据结构
//!
//! Plain data mapped from `config.toml`. Defaults are declared next to the
//! fields; nothing here checks paths or reaches the network.
//!
//! 纯数据：从 `config.toml` 映射而来，不做任何 I/O。

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which key-value backend the store persists to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    /// Browser `localStorage` (wasm32 builds).
    Web,
    /// System keychain.
    Secure,
    /// One file per key under the app data directory.
    #[default]
    File,
    /// Process memory only.
    Memory,
}

impl fmt::Display for StorageBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageBackendKind::Web => "web",
            StorageBackendKind::Secure => "secure",
            StorageBackendKind::File => "file",
            StorageBackendKind::Memory => "memory",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Profile service root. Absent means the store runs without a mirror.
    pub base_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Consecutive failed local writes before the store reports degraded mode.
    pub degrade_after_failures: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            degrade_after_failures: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub user_id: Option<String>,
}

/// Application configuration DTO
/// 应用配置 DTO
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub remote: RemoteConfig,
    pub store: StoreConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
