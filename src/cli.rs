//! Command-line surface over the bookmark store.
//!
//! Each command runs one store operation, waits until the local write is
//! durable and renders the outcome as an `OperationResult` JSON document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use jt_app::models::{
    BookmarkListPayload, BookmarkPayload, BookmarkView, DeadlinesPayload, NoPayload,
    OperationResult,
};
use jt_app::{Applied, BookmarkStore};
use jt_core::bookmark::{
    parse_deadline, ApplicationStatus, BookmarkError, BookmarkPatch, BookmarkRecord, JobRecord,
};
use jt_core::ids::JobId;

#[derive(Debug, Parser)]
#[command(name = "jobtrack")]
#[command(about = "Bookmark jobs and track application progress")]
pub struct Cli {
    /// Path to config.toml (defaults to JOBTRACK_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Sign in as this user before running the command
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bookmark a job, or refresh an existing bookmark
    Add(AddArgs),

    /// Delete a bookmark
    Remove {
        job_id: String,
    },

    /// Set the application status
    Status {
        job_id: String,
        /// Saved, Applied, Interviewing, Offer or Rejected
        status: ApplicationStatus,
    },

    /// Set or clear the application deadline
    Deadline {
        job_id: String,
        /// RFC 3339 timestamp or YYYY-MM-DD
        #[arg(value_parser = parse_deadline, required_unless_present = "clear")]
        date: Option<DateTime<Utc>>,
        #[arg(long, conflicts_with = "date")]
        clear: bool,
    },

    /// Replace the notes
    Notes {
        job_id: String,
        text: String,
    },

    /// Move a bookmark out of the active pool
    Complete {
        job_id: String,
    },

    /// Move a bookmark back into the active pool
    Activate {
        job_id: String,
    },

    /// List bookmarks (active by default)
    List {
        #[arg(long, conflicts_with = "all")]
        completed: bool,
        #[arg(long)]
        all: bool,
    },

    /// Deadline badges of active bookmarks, soonest first
    Deadlines,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Read the job from a search API JSON object instead of flags
    #[arg(long, conflicts_with_all = ["job_id", "title", "employer", "country", "logo"])]
    pub json: Option<PathBuf>,

    #[arg(long, required_unless_present = "json")]
    pub job_id: Option<String>,

    #[arg(long, required_unless_present = "json")]
    pub title: Option<String>,

    #[arg(long, required_unless_present = "json")]
    pub employer: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub logo: Option<String>,

    /// RFC 3339 timestamp or YYYY-MM-DD
    #[arg(long, value_parser = parse_deadline)]
    pub deadline: Option<DateTime<Utc>>,

    #[arg(long, default_value = "")]
    pub notes: String,
}

impl AddArgs {
    fn job_record(&self) -> Result<JobRecord> {
        if let Some(path) = &self.json {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read job file: {}", path.display()))?;
            return serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse job JSON: {}", path.display()));
        }

        let (Some(job_id), Some(title), Some(employer)) =
            (&self.job_id, &self.title, &self.employer)
        else {
            anyhow::bail!("--job-id, --title and --employer are required without --json");
        };
        let mut job = JobRecord::new(job_id.as_str(), title.as_str(), employer.as_str());
        if let Some(country) = &self.country {
            job = job.with_job_country(country.as_str());
        }
        if let Some(logo) = &self.logo {
            job = job.with_employer_logo(logo.as_str());
        }
        Ok(job)
    }
}

/// Run one command against a loaded store.
///
/// Store failures are part of the rendered result; only problems outside
/// the store (an unreadable job file) are returned as `Err`.
pub async fn execute(store: &BookmarkStore, command: Command) -> Result<Value> {
    match command {
        Command::Add(args) => {
            let job = args.job_record()?;
            let result = settle(store.add_bookmark(job, args.deadline, args.notes)).await;
            render(result.map(|bookmark| BookmarkPayload { bookmark }))
        }
        Command::Remove { job_id } => {
            let result = settle(store.remove_bookmark(&JobId::from(job_id))).await;
            render(result.map(|()| NoPayload {}))
        }
        Command::Status { job_id, status } => {
            update(store, job_id, BookmarkPatch::new().status(status)).await
        }
        Command::Deadline {
            job_id,
            date,
            clear,
        } => {
            let patch = if clear {
                BookmarkPatch::new().clear_deadline()
            } else {
                BookmarkPatch::new().deadline(date)
            };
            update(store, job_id, patch).await
        }
        Command::Notes { job_id, text } => {
            update(store, job_id, BookmarkPatch::new().notes(text)).await
        }
        Command::Complete { job_id } => {
            let result = settle(store.mark_as_completed(&JobId::from(job_id))).await;
            render(result.map(|()| NoPayload {}))
        }
        Command::Activate { job_id } => {
            let result = settle(store.move_to_active(&JobId::from(job_id))).await;
            render(result.map(|()| NoPayload {}))
        }
        Command::List { completed, all } => {
            let records = if all {
                store.bookmarks()
            } else if completed {
                store.completed_bookmarks()
            } else {
                store.active_bookmarks()
            };
            render(Ok(BookmarkListPayload {
                bookmarks: records.into_iter().map(|r| view(store, r)).collect(),
            }))
        }
        Command::Deadlines => render(Ok(DeadlinesPayload {
            deadlines: store.deadline_indicators(),
        })),
    }
}

async fn update(store: &BookmarkStore, job_id: String, patch: BookmarkPatch) -> Result<Value> {
    let result = settle(store.update_bookmark(&JobId::from(job_id), patch)).await;
    render(result.map(|bookmark| BookmarkPayload { bookmark }))
}

async fn settle<T>(applied: Result<Applied<T>, BookmarkError>) -> Result<T, BookmarkError> {
    applied?.durable().await
}

fn view(store: &BookmarkStore, record: BookmarkRecord) -> BookmarkView {
    BookmarkView {
        days_until_deadline: store.days_until_deadline(&record),
        record,
    }
}

fn render<T: Serialize>(result: Result<T, BookmarkError>) -> Result<Value> {
    serde_json::to_value(OperationResult::from(result)).context("Failed to render result")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_status_case_insensitively() {
        let cli = Cli::try_parse_from(["jobtrack", "--user", "alice", "status", "j1", "interviewing"])
            .unwrap();
        assert_eq!(cli.user.as_deref(), Some("alice"));
        match cli.command {
            Command::Status { job_id, status } => {
                assert_eq!(job_id, "j1");
                assert_eq!(status, ApplicationStatus::Interviewing);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_deadline_requires_date_or_clear() {
        assert!(Cli::try_parse_from(["jobtrack", "deadline", "j1"]).is_err());
        assert!(Cli::try_parse_from(["jobtrack", "deadline", "j1", "not-a-date"]).is_err());
        assert!(Cli::try_parse_from(["jobtrack", "deadline", "j1", "--clear"]).is_ok());
        assert!(Cli::try_parse_from(["jobtrack", "deadline", "j1", "2026-03-01"]).is_ok());
    }

    #[test]
    fn test_add_needs_fields_or_json() {
        assert!(Cli::try_parse_from(["jobtrack", "add", "--job-id", "j1"]).is_err());
        assert!(Cli::try_parse_from(["jobtrack", "add", "--json", "job.json"]).is_ok());
        assert!(Cli::try_parse_from([
            "jobtrack", "add", "--job-id", "j1", "--title", "T", "--employer", "E"
        ])
        .is_ok());
    }

    #[test]
    fn test_job_record_from_json_keeps_extra_fields() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"job_id": "j9", "job_title": "SRE", "employer_name": "Acme", "job_city": "Oslo"}"#,
        )
        .unwrap();
        let args = AddArgs {
            json: Some(file.path().to_path_buf()),
            job_id: None,
            title: None,
            employer: None,
            country: None,
            logo: None,
            deadline: None,
            notes: String::new(),
        };
        let job = args.job_record().unwrap();
        assert_eq!(job.job_id, JobId::from("j9"));
        assert_eq!(job.extra["job_city"], serde_json::json!("Oslo"));
    }
}
