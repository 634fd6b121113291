//! Bookmark store: in-memory state, ordered persistence and the remote mirror.

mod applied;
mod events;
mod mirror;
mod state;
mod store;
mod writer;

pub use applied::Applied;
pub use events::{LoadSource, StoreEvent};
pub use store::{BookmarkStore, BookmarkStoreConfig, LoadReport};
