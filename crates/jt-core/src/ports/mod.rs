//! Port interfaces for the application layer
//!
//! Ports define the contract between the bookmark store and the
//! infrastructure that backs it. Storage, the remote profile service,
//! identity and time are all reached through these traits, so the store
//! itself never touches a platform API.
//!
//! 端口定义了书签存储与基础设施之间的契约。

pub mod app_dirs;
mod clock;
pub mod errors;
pub mod identity;
pub mod kv_store;
pub mod remote_profile;

pub use app_dirs::AppDirsPort;
pub use clock::ClockPort;
pub use errors::AppDirsError;
pub use identity::IdentityProviderPort;
pub use kv_store::{KeyValueStoreError, KeyValueStorePort};
pub use remote_profile::{RemotePutResponse, RemoteProfileError, RemoteProfilePort};
