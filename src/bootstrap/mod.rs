pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_default, resolve_config_path};
pub use wiring::{platform_app_dirs, resolve_app_dirs, wire_dependencies, AppRuntime, WiringError};
