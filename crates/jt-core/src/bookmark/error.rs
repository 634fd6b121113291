use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::JobId;

/// Failure categories reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    PersistenceError,
    CorruptState,
    RemoteMirrorError,
    NoActiveSession,
}

/// Bookmark store errors.
///
/// 书签存储错误类型。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookmarkError {
    /// The targeted bookmark does not exist.
    ///
    /// 目标书签不存在。
    #[error("bookmark not found: {0}")]
    NotFound(JobId),

    /// The local backend failed to read or write.
    ///
    /// 本地存储读写失败。
    #[error("failed to persist bookmarks: {0}")]
    Persistence(String),

    /// Persisted data could not be parsed.
    ///
    /// 持久化数据无法解析。
    #[error("stored bookmarks are corrupt: {0}")]
    CorruptState(String),

    /// The remote mirror rejected or failed a request. Never fatal.
    ///
    /// 远程镜像失败（非致命）。
    #[error("remote mirror failed: {0}")]
    RemoteMirror(String),

    /// No user is signed in.
    ///
    /// 当前没有登录用户。
    #[error("no signed-in user")]
    NoActiveSession,
}

impl BookmarkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookmarkError::NotFound(_) => ErrorKind::NotFound,
            BookmarkError::Persistence(_) => ErrorKind::PersistenceError,
            BookmarkError::CorruptState(_) => ErrorKind::CorruptState,
            BookmarkError::RemoteMirror(_) => ErrorKind::RemoteMirrorError,
            BookmarkError::NoActiveSession => ErrorKind::NoActiveSession,
        }
    }
}
