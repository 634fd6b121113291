//! Bookmark domain: tracked job applications and their derived views.
//!
//! 书签领域：已收藏的职位申请及其派生视图。

mod collection;
mod deadline;
mod error;
mod model;
mod patch;

pub use collection::{BookmarkCollection, Upsert};
pub use deadline::{
    days_until, days_until_deadline, parse_deadline, DeadlineIndicator, DeadlineParseError,
};
pub use error::{BookmarkError, ErrorKind};
pub use model::{ApplicationStatus, BookmarkRecord, JobRecord, UnknownStatus};
pub use patch::BookmarkPatch;

use crate::ids::UserId;

/// Key under which a user's collection is persisted.
pub fn storage_key(user_id: &UserId) -> String {
    format!("bookmarks:{user_id}")
}
