use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory unavailable")]
    DataLocalDirUnavailable,

    #[error("system config directory unavailable")]
    ConfigDirUnavailable,
}
