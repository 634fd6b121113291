use serde::Serialize;

use jt_core::bookmark::{BookmarkRecord, DeadlineIndicator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkPayload {
    pub bookmark: BookmarkRecord,
}

/// A bookmark as rendered in a list, with its deadline countdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkView {
    #[serde(flatten)]
    pub record: BookmarkRecord,
    pub days_until_deadline: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkListPayload {
    pub bookmarks: Vec<BookmarkView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadlinesPayload {
    pub deadlines: Vec<DeadlineIndicator>,
}
