//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Locate `config.toml` / 定位配置文件
//! - ✅ Parse TOML into the AppConfig DTO / 将 TOML 解析为 AppConfig DTO
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No business rules / 禁止业务规则**
//!
//! ## Iron Rule / 铁律
//!
//! > **Pure data loading only. Defaults live on the DTO, not here.**
//! > **仅纯数据加载。默认值定义在 DTO 上。**

use std::path::{Path, PathBuf};

use anyhow::Context;
use jt_core::app_dirs::AppDirs;
use jt_core::config::AppConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "JOBTRACK_CONFIG";

/// Pick the config file: `--config`, then `JOBTRACK_CONFIG`, then
/// `<app_config_root>/config.toml`.
///
/// 配置文件查找顺序：命令行参数、环境变量、默认路径。
pub fn resolve_config_path(explicit: Option<PathBuf>, app_dirs: &AppDirs) -> PathBuf {
    explicit
        .or_else(|| {
            std::env::var_os(CONFIG_ENV_VAR)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| app_dirs.config_file())
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not a valid config
/// document.
/// 无法读取文件或内容不是有效配置时返回错误。
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    AppConfig::from_toml_str(&content).context("Failed to parse config as TOML")
}

/// Like [`load_config`], but a missing file yields the defaults.
///
/// 文件不存在时返回默认配置。
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        return Ok(AppConfig::default());
    }
    load_config(config_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jt_core::config::StorageBackendKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn app_dirs() -> AppDirs {
        AppDirs {
            app_data_root: PathBuf::from("/data/jobtrack"),
            app_config_root: PathBuf::from("/config/jobtrack"),
        }
    }

    /// Test that valid TOML is parsed correctly
    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [storage]
            backend = "memory"

            [remote]
            base_url = "http://127.0.0.1:9000"
            timeout_ms = 250

            [session]
            user_id = "alice"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path().to_path_buf()).unwrap();

        assert_eq!(config.storage.backend, StorageBackendKind::Memory);
        assert_eq!(config.remote.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(config.remote.timeout_ms, 250);
        assert_eq!(config.session.user_id.as_deref(), Some("alice"));
        assert_eq!(config.store.degrade_after_failures, 3);
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[storage\nbackend = ").unwrap();

        let err = load_config(temp_file.path().to_path_buf()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config as TOML"));
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(PathBuf::from("/nonexistent/jobtrack/config.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_config_path(Some(PathBuf::from("/tmp/custom.toml")), &app_dirs());
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }
}
