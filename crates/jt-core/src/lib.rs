//! # jt-core
//!
//! Core domain models and ports for the JobTrack bookmark store.
//!
//! This crate contains pure domain logic without any infrastructure dependencies.

pub mod app_dirs;
pub mod bookmark;
pub mod config;
pub mod ids;
pub mod ports;

// Re-export commonly used types at the crate root
pub use app_dirs::AppDirs;
pub use bookmark::{
    storage_key, ApplicationStatus, BookmarkCollection, BookmarkError, BookmarkPatch,
    BookmarkRecord, DeadlineIndicator, ErrorKind, JobRecord,
};
pub use config::{AppConfig, StorageBackendKind};
pub use ids::{JobId, UserId};
