use async_trait::async_trait;
use thiserror::Error;

/// Key-value backend errors.
///
/// 键值存储后端错误类型。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyValueStoreError {
    /// The backend does not exist on this platform or is not reachable.
    ///
    /// 平台不支持或不可用。
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),

    /// Access was denied by the platform (permissions/ACL).
    ///
    /// 平台权限或 ACL 拒绝访问。
    #[error("key-value store access denied: {0}")]
    PermissionDenied(String),

    /// The backend refused the write for lack of space.
    ///
    /// 存储空间不足。
    #[error("key-value store quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Other storage failures.
    ///
    /// 其它存储失败。
    #[error("key-value store failed: {0}")]
    Other(String),
}

/// Async string key-value storage.
///
/// Every call may fail independently; callers must not assume a write has
/// landed until the returned future resolves.
///
/// 异步键值存储端口：按 key 存取字符串。
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    ///
    /// 按 key 读取数据，不存在时返回 `None`。
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Write a value, overwriting any previous one.
    ///
    /// 按 key 写入数据（覆盖）。
    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Delete a value. Removing a missing key succeeds.
    ///
    /// 按 key 删除数据。
    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
