use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
    pub app_config_root: PathBuf,
}

impl AppDirs {
    /// Directory holding one file per persisted key.
    pub fn kv_dir(&self) -> PathBuf {
        self.app_data_root.join("kv")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.app_data_root.join("logs")
    }

    pub fn config_file(&self) -> PathBuf {
        self.app_config_root.join("config.toml")
    }
}
