mod bookmark_view;
mod operation_result;

pub use bookmark_view::{BookmarkListPayload, BookmarkPayload, BookmarkView, DeadlinesPayload};
pub use operation_result::{NoPayload, OperationResult};
