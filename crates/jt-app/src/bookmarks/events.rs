use serde::Serialize;

use jt_core::ids::UserId;

/// Where the collection installed by `load` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadSource {
    /// Nothing persisted, locally or remotely.
    Empty,
    /// Local backend.
    Local,
    /// Remote profile, re-persisted locally.
    Remote,
}

/// Store-level notifications.
///
/// Failures that happen after an optimistic mutation has already returned
/// are only visible here.
///
/// 存储级事件：乐观写入返回之后发生的失败只会通过事件上报。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    Loaded {
        user_id: UserId,
        records: usize,
        source: LoadSource,
        recovered_from_corrupt: bool,
    },
    Cleared {
        user_id: UserId,
    },
    PersistFailed {
        user_id: UserId,
        error: String,
    },
    PersistenceDegraded {
        user_id: UserId,
        consecutive_failures: u32,
    },
    PersistenceRecovered {
        user_id: UserId,
    },
    MirrorFailed {
        user_id: UserId,
        error: String,
    },
    Mirrored {
        user_id: UserId,
        records: usize,
    },
}
