use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::ids::JobId;

/// Display fields of a job listing, captured when the job is bookmarked.
///
/// Field names follow the search API payload. Fields the store does not
/// interpret are kept verbatim in `extra`, so a snapshot survives schema
/// changes on the API side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub employer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_country: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobRecord {
    pub fn new(
        job_id: impl Into<JobId>,
        job_title: impl Into<String>,
        employer_name: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            job_title: job_title.into(),
            employer_name: employer_name.into(),
            employer_logo: None,
            job_country: None,
            extra: Map::new(),
        }
    }

    pub fn with_employer_logo(mut self, logo: impl Into<String>) -> Self {
        self.employer_logo = Some(logo.into());
        self
    }

    pub fn with_job_country(mut self, country: impl Into<String>) -> Self {
        self.job_country = Some(country.into());
        self
    }
}

/// Where the user stands with an application.
///
/// Transitions are unconstrained: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Saved,
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "Saved",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown application status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(trimmed.to_string()))
    }
}

/// One tracked job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub job_id: JobId,
    pub job_snapshot: JobRecord,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookmarkRecord {
    /// A fresh bookmark: `Saved`, active, created and updated at `now`.
    pub fn new(
        job: JobRecord,
        deadline: Option<DateTime<Utc>>,
        notes: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            job_id: job.job_id.clone(),
            job_snapshot: job,
            application_status: ApplicationStatus::Saved,
            deadline,
            notes,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-bookmark: refresh snapshot, deadline and notes, keep status and
    /// the completed flag.
    pub fn rebookmark(
        &mut self,
        job: JobRecord,
        deadline: Option<DateTime<Utc>>,
        notes: String,
        now: DateTime<Utc>,
    ) {
        self.job_snapshot = job;
        self.deadline = deadline;
        self.notes = notes;
        self.updated_at = now;
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}
