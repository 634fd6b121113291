pub mod identity;
pub mod remote;
pub mod storage;
pub mod time;

pub use identity::WatchIdentityProvider;
pub use remote::HttpRemoteProfileClient;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use time::SystemClock;
