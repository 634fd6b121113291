use chrono::{DateTime, Utc};

use super::deadline::DeadlineIndicator;
use super::model::{BookmarkRecord, JobRecord};
use super::patch::BookmarkPatch;
use crate::ids::JobId;

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Ordered set of bookmarks keyed by `job_id`.
///
/// Insertion order is preserved; updates happen in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkCollection {
    records: Vec<BookmarkRecord>,
}

impl BookmarkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw records, collapsing duplicate ids.
    ///
    /// A repeated id replaces the earlier record's data at the earlier position.
    pub fn from_records(records: Vec<BookmarkRecord>) -> Self {
        let mut collection = Self::new();
        for record in records {
            match collection.position(&record.job_id) {
                Some(index) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(job_id = %record.job_id, "Collapsing duplicate bookmark");
                    collection.records[index] = record;
                }
                None => collection.records.push(record),
            }
        }
        collection
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<BookmarkRecord> = serde_json::from_str(raw)?;
        Ok(Self::from_records(records))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[BookmarkRecord] {
        &self.records
    }

    pub fn contains(&self, job_id: &JobId) -> bool {
        self.position(job_id).is_some()
    }

    pub fn get(&self, job_id: &JobId) -> Option<&BookmarkRecord> {
        self.records.iter().find(|r| &r.job_id == job_id)
    }

    fn position(&self, job_id: &JobId) -> Option<usize> {
        self.records.iter().position(|r| &r.job_id == job_id)
    }

    /// Insert a new bookmark or refresh an existing one in place.
    pub fn upsert(
        &mut self,
        job: JobRecord,
        deadline: Option<DateTime<Utc>>,
        notes: String,
        now: DateTime<Utc>,
    ) -> (&BookmarkRecord, Upsert) {
        match self.position(&job.job_id) {
            Some(index) => {
                let record = &mut self.records[index];
                record.rebookmark(job, deadline, notes, now);
                (&self.records[index], Upsert::Updated)
            }
            None => {
                self.records
                    .push(BookmarkRecord::new(job, deadline, notes, now));
                let last = self.records.len() - 1;
                (&self.records[last], Upsert::Inserted)
            }
        }
    }

    pub fn update(
        &mut self,
        job_id: &JobId,
        patch: &BookmarkPatch,
        now: DateTime<Utc>,
    ) -> Option<&BookmarkRecord> {
        let index = self.position(job_id)?;
        patch.apply_to(&mut self.records[index], now);
        Some(&self.records[index])
    }

    pub fn remove(&mut self, job_id: &JobId) -> Option<BookmarkRecord> {
        let index = self.position(job_id)?;
        Some(self.records.remove(index))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn active(&self) -> impl Iterator<Item = &BookmarkRecord> {
        self.records.iter().filter(|r| !r.completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &BookmarkRecord> {
        self.records.iter().filter(|r| r.completed)
    }

    /// Deadline badges for active records, soonest first.
    pub fn deadline_indicators(&self, now: DateTime<Utc>) -> Vec<DeadlineIndicator> {
        let mut indicators: Vec<DeadlineIndicator> = self
            .records
            .iter()
            .filter_map(|r| DeadlineIndicator::for_record(r, now))
            .collect();
        // stable: ties keep insertion order
        indicators.sort_by_key(|i| i.days_remaining);
        indicators
    }
}
