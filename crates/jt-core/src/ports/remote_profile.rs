use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bookmark::BookmarkRecord;
use crate::ids::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteProfileError {
    #[error("remote request timed out after {0} ms")]
    Timeout(u64),

    #[error("remote transport error: {0}")]
    Transport(String),

    #[error("remote returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("remote response could not be decoded: {0}")]
    Decode(String),
}

/// Outcome of a bookmark upload as reported by the profile service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePutResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RemotePutResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// User profile service that keeps a copy of the bookmark list.
///
/// The service is authoritative only when reachable; callers treat every
/// failure as non-fatal.
///
/// 远程用户资料服务端口（尽力而为的书签镜像）。
#[async_trait]
pub trait RemoteProfilePort: Send + Sync {
    /// Fetch the stored list. `Ok(None)` when the profile has none.
    async fn get_bookmarks(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Vec<BookmarkRecord>>, RemoteProfileError>;

    /// Replace the stored list.
    async fn put_bookmarks(
        &self,
        user_id: &UserId,
        bookmarks: &[BookmarkRecord],
    ) -> Result<RemotePutResponse, RemoteProfileError>;
}
