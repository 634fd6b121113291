use std::path::PathBuf;

use jt_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "jobtrack";

fn resolved_app_dir_name() -> String {
    match std::env::var("JOBTRACK_PROFILE") {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

pub struct DirsAppDirsAdapter {
    base_data_local_dir_override: Option<PathBuf>,
    base_config_dir_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_data_local_dir_override: None,
            base_config_dir_override: None,
        }
    }

    #[cfg(test)]
    fn with_bases(data: PathBuf, config: PathBuf) -> Self {
        Self {
            base_data_local_dir_override: Some(data),
            base_config_dir_override: Some(config),
        }
    }

    pub fn base_data_local_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_data_local_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }

    fn base_config_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_config_dir_override {
            return Some(base.clone());
        }
        dirs::config_dir()
    }
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        let base_config = self
            .base_config_dir()
            .ok_or(AppDirsError::ConfigDirUnavailable)?;
        let app_dir_name = resolved_app_dir_name();

        Ok(AppDirs {
            app_data_root: base_data.join(&app_dir_name),
            app_config_root: base_config.join(&app_dir_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static PROFILE_ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_profile<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = PROFILE_ENV_LOCK.lock().unwrap();
        let previous = std::env::var("JOBTRACK_PROFILE").ok();

        match value {
            Some(profile) => std::env::set_var("JOBTRACK_PROFILE", profile),
            None => std::env::remove_var("JOBTRACK_PROFILE"),
        }

        let result = f();

        match previous {
            Some(profile) => std::env::set_var("JOBTRACK_PROFILE", profile),
            None => std::env::remove_var("JOBTRACK_PROFILE"),
        }

        result
    }

    #[test]
    fn adapter_appends_jobtrack_dir_name() {
        with_profile(None, || {
            let adapter =
                DirsAppDirsAdapter::with_bases(PathBuf::from("/tmp/data"), PathBuf::from("/tmp/cfg"));
            let dirs = adapter.get_app_dirs().unwrap();
            assert_eq!(dirs.app_data_root, PathBuf::from("/tmp/data/jobtrack"));
            assert_eq!(dirs.app_config_root, PathBuf::from("/tmp/cfg/jobtrack"));
        });
    }

    #[test]
    fn adapter_isolates_dirs_per_profile() {
        let dirs_a = with_profile(Some("a"), || {
            DirsAppDirsAdapter::with_bases(PathBuf::from("/tmp"), PathBuf::from("/tmp"))
                .get_app_dirs()
                .unwrap()
        });
        let dirs_b = with_profile(Some("b"), || {
            DirsAppDirsAdapter::with_bases(PathBuf::from("/tmp"), PathBuf::from("/tmp"))
                .get_app_dirs()
                .unwrap()
        });

        assert_eq!(dirs_a.app_data_root, PathBuf::from("/tmp/jobtrack-a"));
        assert_eq!(dirs_b.app_data_root, PathBuf::from("/tmp/jobtrack-b"));
        assert_ne!(dirs_a.app_config_root, dirs_b.app_config_root);
    }
}
