//! Deadline math and parsing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use super::model::BookmarkRecord;
use crate::ids::JobId;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days until `deadline`, rounded up: `ceil((deadline - now) / 1 day)`.
///
/// A deadline later today yields `1`, one earlier today yields `0`, and
/// anything further in the past is negative.
pub fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff_ms = (deadline - now).num_milliseconds();
    -(-diff_ms).div_euclid(MILLIS_PER_DAY)
}

/// Days until the record's deadline, or `None` when no deadline is set.
pub fn days_until_deadline(record: &BookmarkRecord, now: DateTime<Utc>) -> Option<i64> {
    record.deadline.map(|deadline| days_until(deadline, now))
}

/// Deadline badge for an active bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineIndicator {
    pub job_id: JobId,
    pub days_remaining: i64,
    pub overdue: bool,
}

impl DeadlineIndicator {
    /// `None` for completed records and records without a deadline.
    pub fn for_record(record: &BookmarkRecord, now: DateTime<Utc>) -> Option<Self> {
        if record.completed {
            return None;
        }
        let days_remaining = days_until_deadline(record, now)?;
        Some(Self {
            job_id: record.job_id.clone(),
            days_remaining,
            overdue: days_remaining < 0,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid deadline {input:?}: expected RFC 3339 timestamp or YYYY-MM-DD")]
pub struct DeadlineParseError {
    pub input: String,
}

/// Parse a deadline as sent by the date pickers.
///
/// Native pickers send RFC 3339 timestamps; the web date input sends a bare
/// `YYYY-MM-DD`, which is taken as midnight UTC.
pub fn parse_deadline(input: &str) -> Result<DateTime<Utc>, DeadlineParseError> {
    let trimmed = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DeadlineParseError {
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::model::JobRecord;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_exactly_three_days_out() {
        assert_eq!(days_until(now() + Duration::days(3), now()), 3);
    }

    #[test]
    fn test_partial_days_round_up() {
        assert_eq!(days_until(now() + Duration::hours(60), now()), 3);
        assert_eq!(days_until(now() + Duration::minutes(1), now()), 1);
        assert_eq!(days_until(now(), now()), 0);
    }

    #[test]
    fn test_past_deadlines_are_negative() {
        assert_eq!(days_until(now() - Duration::hours(12), now()), 0);
        assert_eq!(days_until(now() - Duration::hours(36), now()), -1);
        assert_eq!(days_until(now() - Duration::days(2), now()), -2);
    }

    #[test]
    fn test_indicator_skips_completed_and_undated() {
        let mut record = BookmarkRecord::new(
            JobRecord::new("j1", "T", "E"),
            Some(now() - Duration::days(2)),
            String::new(),
            now(),
        );
        let indicator = DeadlineIndicator::for_record(&record, now()).unwrap();
        assert_eq!(indicator.days_remaining, -2);
        assert!(indicator.overdue);

        record.completed = true;
        assert!(DeadlineIndicator::for_record(&record, now()).is_none());

        record.completed = false;
        record.deadline = None;
        assert!(DeadlineIndicator::for_record(&record, now()).is_none());
        assert_eq!(days_until_deadline(&record, now()), None);
    }

    #[test]
    fn test_parse_deadline_accepts_both_picker_formats() {
        assert_eq!(
            parse_deadline("2026-05-01").unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_deadline("2026-05-01T14:30:00.000Z").unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 1, 14, 30, 0).unwrap()
        );
        assert_eq!(
            parse_deadline("2026-05-01T16:30:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 1, 14, 30, 0).unwrap()
        );
        assert!(parse_deadline("next friday").is_err());
    }
}
