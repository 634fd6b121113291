//! # Store Dependencies / 存储依赖
//!
//! Parameter grouping for [`BookmarkStore`](crate::bookmarks::BookmarkStore)
//! construction. Not a builder: no defaults, no hidden logic.
//! 仅用于参数打包，不是 Builder 模式。

use std::sync::Arc;

use jt_core::ports::{ClockPort, KeyValueStorePort, RemoteProfilePort};

pub struct BookmarkStoreDeps {
    // Local persistence / 本地持久化
    pub kv_store: Arc<dyn KeyValueStorePort>,

    // Remote mirror, absent when no profile service is configured
    // 远程镜像（未配置时为空）
    pub remote: Option<Arc<dyn RemoteProfilePort>>,

    pub clock: Arc<dyn ClockPort>,
}
