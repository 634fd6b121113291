use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::model::{ApplicationStatus, BookmarkRecord};

/// Partial update of a bookmark.
///
/// `None` leaves a field untouched. For `deadline` the inner option carries
/// the new value, so `Some(None)` clears the deadline while `None` keeps it.
/// The JSON form follows the same rule: an absent `deadline` key is "keep",
/// `"deadline": null` is "clear".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookmarkPatch {
    #[serde(default)]
    pub application_status: Option<ApplicationStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub deadline: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl BookmarkPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: ApplicationStatus) -> Self {
        self.application_status = Some(status);
        self
    }

    pub fn deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn clear_deadline(self) -> Self {
        self.deadline(None)
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.application_status.is_none()
            && self.deadline.is_none()
            && self.notes.is_none()
            && self.completed.is_none()
    }

    /// Merge the supplied fields into `record` and stamp `updated_at`.
    pub fn apply_to(&self, record: &mut BookmarkRecord, now: DateTime<Utc>) {
        if let Some(status) = self.application_status {
            record.application_status = status;
        }
        if let Some(deadline) = self.deadline {
            record.deadline = deadline;
        }
        if let Some(notes) = &self.notes {
            record.notes = notes.clone();
        }
        if let Some(completed) = self.completed {
            record.completed = completed;
        }
        record.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::model::JobRecord;
    use chrono::TimeZone;

    fn record_with_deadline() -> BookmarkRecord {
        let created = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();
        let deadline = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        BookmarkRecord::new(
            JobRecord::new("j1", "Backend Engineer", "Acme"),
            Some(deadline),
            "call recruiter".to_string(),
            created,
        )
    }

    #[test]
    fn test_status_patch_leaves_other_fields() {
        let mut record = record_with_deadline();
        let before = record.clone();
        let now = Utc.with_ymd_and_hms(2026, 1, 6, 8, 0, 0).unwrap();

        BookmarkPatch::new()
            .status(ApplicationStatus::Interviewing)
            .apply_to(&mut record, now);

        assert_eq!(record.application_status, ApplicationStatus::Interviewing);
        assert_eq!(record.deadline, before.deadline);
        assert_eq!(record.notes, before.notes);
        assert_eq!(record.completed, before.completed);
        assert_eq!(record.updated_at, now);
    }

    #[test]
    fn test_explicit_null_deadline_clears_but_absent_keeps() {
        let keep: BookmarkPatch = serde_json::from_str(r#"{"notes": "x"}"#).unwrap();
        assert_eq!(keep.deadline, None);

        let clear: BookmarkPatch = serde_json::from_str(r#"{"deadline": null}"#).unwrap();
        assert_eq!(clear.deadline, Some(None));

        let now = Utc.with_ymd_and_hms(2026, 1, 6, 8, 0, 0).unwrap();
        let mut record = record_with_deadline();
        keep.apply_to(&mut record, now);
        assert!(record.deadline.is_some());
        clear.apply_to(&mut record, now);
        assert!(record.deadline.is_none());
    }

    #[test]
    fn test_status_may_move_backwards() {
        let now = Utc.with_ymd_and_hms(2026, 1, 6, 8, 0, 0).unwrap();
        let mut record = record_with_deadline();
        BookmarkPatch::new()
            .status(ApplicationStatus::Offer)
            .apply_to(&mut record, now);
        BookmarkPatch::new()
            .status(ApplicationStatus::Saved)
            .apply_to(&mut record, now);
        assert_eq!(record.application_status, ApplicationStatus::Saved);
    }

    #[test]
    fn test_empty_patch_detection() {
        assert!(BookmarkPatch::new().is_empty());
        assert!(!BookmarkPatch::new().clear_deadline().is_empty());
    }
}
