//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Resolve application directories / 解析应用目录
//! - ✅ Create infra and platform implementations / 创建 infra 与 platform 层具体实现
//! - ✅ Inject them into the bookmark store / 将依赖注入书签存储
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//! - Do not decide what happens to bookmarks on sign-in or sign-out
//! - 不决定登录或登出时书签如何处理
//!
//! ## Architecture Principle / 架构原则
//!
//! > **This is the only place allowed to depend on jt-infra + jt-platform + jt-app simultaneously.**
//! > **这是唯一允许同时依赖 jt-infra、jt-platform 和 jt-app 的地方。**

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use jt_app::{BookmarkStore, BookmarkStoreConfig, BookmarkStoreDeps, SessionCoordinator};
use jt_core::app_dirs::AppDirs;
use jt_core::config::AppConfig;
use jt_core::ids::UserId;
use jt_core::ports::{AppDirsError, AppDirsPort, RemoteProfilePort};
use jt_infra::{HttpRemoteProfileClient, SystemClock, WatchIdentityProvider};
use jt_platform::{create_key_value_store, DirsAppDirsAdapter, StorageFactoryError};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Application directories unavailable: {0}")]
    AppDirs(#[from] AppDirsError),

    #[error("Storage initialization failed: {0}")]
    StorageInit(#[from] StorageFactoryError),

    #[error("Remote profile client initialization failed: {0:#}")]
    RemoteInit(anyhow::Error),
}

/// Everything the host needs at runtime.
///
/// Assembled once by [`wire_dependencies`]. This is a plain struct, not a
/// Builder.
pub struct AppRuntime {
    pub app_dirs: AppDirs,
    pub store: BookmarkStore,
    pub identity: Arc<WatchIdentityProvider>,
    pub coordinator: SessionCoordinator,
}

/// Directories of the platform layout, before any config is read.
pub fn platform_app_dirs() -> WiringResult<AppDirs> {
    Ok(DirsAppDirsAdapter::new().get_app_dirs()?)
}

/// Apply `storage.data_dir`, which replaces the data root.
pub fn resolve_app_dirs(config: &AppConfig, mut app_dirs: AppDirs) -> AppDirs {
    if let Some(data_dir) = &config.storage.data_dir {
        app_dirs.app_data_root = data_dir.clone();
    }
    app_dirs
}

/// Build the store and its collaborators from the loaded config.
///
/// Must run inside a Tokio runtime: the store spawns its writer task.
///
/// 根据配置组装书签存储及其依赖。
pub fn wire_dependencies(config: &AppConfig, app_dirs: AppDirs) -> WiringResult<AppRuntime> {
    let kv_store = create_key_value_store(config.storage.backend, &app_dirs.app_data_root)?;

    let remote = match &config.remote.base_url {
        Some(base_url) => {
            let client = HttpRemoteProfileClient::new(
                base_url,
                Duration::from_millis(config.remote.timeout_ms),
            )
            .map_err(WiringError::RemoteInit)?;
            info!(base_url = %base_url, "Remote profile mirror enabled");
            Some(Arc::new(client) as Arc<dyn RemoteProfilePort>)
        }
        None => {
            info!("No remote profile configured, bookmarks stay local");
            None
        }
    };

    let store = BookmarkStore::new(
        BookmarkStoreDeps {
            kv_store,
            remote,
            clock: Arc::new(SystemClock),
        },
        BookmarkStoreConfig::from_app_config(config),
    );

    let initial_user = config.session.user_id.clone().map(UserId::from);
    let identity = Arc::new(WatchIdentityProvider::new(initial_user));
    let coordinator = SessionCoordinator::new(store.clone(), identity.clone());

    info!(
        backend = %config.storage.backend,
        data_root = %app_dirs.app_data_root.display(),
        "Dependencies wired"
    );

    Ok(AppRuntime {
        app_dirs,
        store,
        identity,
        coordinator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jt_core::config::StorageBackendKind;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackendKind::Memory;
        config.session.user_id = Some("alice".to_string());
        config
    }

    fn app_dirs() -> AppDirs {
        AppDirs {
            app_data_root: "/unused/data".into(),
            app_config_root: "/unused/config".into(),
        }
    }

    #[test]
    fn test_data_dir_override_replaces_data_root() {
        let mut config = AppConfig::default();
        assert_eq!(resolve_app_dirs(&config, app_dirs()), app_dirs());

        config.storage.data_dir = Some("/srv/jobtrack".into());
        let resolved = resolve_app_dirs(&config, app_dirs());
        assert_eq!(resolved.app_data_root, std::path::PathBuf::from("/srv/jobtrack"));
        assert_eq!(resolved.app_config_root, app_dirs().app_config_root);
    }

    #[tokio::test]
    async fn test_wiring_with_memory_backend_loads_configured_user() {
        let runtime = wire_dependencies(&memory_config(), app_dirs()).unwrap();

        let report = runtime.coordinator.sync_now().await.expect("load report");
        assert_eq!(report.user_id, UserId::from("alice"));
        assert!(runtime.store.is_loaded());
    }

    #[tokio::test]
    async fn test_invalid_remote_url_is_a_wiring_error() {
        let mut config = memory_config();
        config.remote.base_url = Some("not a url".to_string());
        let result = wire_dependencies(&config, app_dirs());
        assert!(matches!(result, Err(WiringError::RemoteInit(_))));
    }
}
