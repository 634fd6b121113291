//! # jt-platform
//!
//! Platform-specific adapters for JobTrack.
//!
//! This crate holds the implementations that talk to the operating system
//! or the browser: the system keychain, `window.localStorage` and the
//! platform directory layout.

pub mod app_dirs;
pub mod storage;

pub use app_dirs::DirsAppDirsAdapter;
pub use storage::{create_key_value_store, StorageFactoryError};
