//! JobTrack application layer
//!
//! The bookmark store and the coordination that ties it to the signed-in
//! user. Infrastructure is reached only through `jt-core` ports.

pub mod bookmarks;
pub mod deps;
pub mod models;
pub mod session;

pub use bookmarks::{Applied, BookmarkStore, BookmarkStoreConfig, LoadReport, LoadSource, StoreEvent};
pub use deps::BookmarkStoreDeps;
pub use models::OperationResult;
pub use session::SessionCoordinator;
