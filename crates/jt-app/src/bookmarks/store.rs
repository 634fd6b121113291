use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, info, info_span, warn, Instrument};

use jt_core::bookmark::{
    days_until_deadline, storage_key, BookmarkCollection, BookmarkError, BookmarkPatch,
    BookmarkRecord, DeadlineIndicator, ErrorKind, JobRecord, Upsert,
};
use jt_core::config::AppConfig;
use jt_core::ids::{JobId, UserId};
use jt_core::ports::KeyValueStorePort;

use super::applied::Applied;
use super::events::{LoadSource, StoreEvent};
use super::mirror::RemoteMirror;
use super::state::{Session, Shared, StoreState};
use super::writer::WriteQueue;
use crate::deps::BookmarkStoreDeps;

/// Store tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkStoreConfig {
    /// Consecutive failed local writes before the store reports degraded mode.
    pub degrade_after_failures: u32,
    /// Upper bound for every remote profile call.
    pub remote_timeout: Duration,
}

impl Default for BookmarkStoreConfig {
    fn default() -> Self {
        Self {
            degrade_after_failures: 3,
            remote_timeout: Duration::from_millis(5_000),
        }
    }
}

impl BookmarkStoreConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            degrade_after_failures: config.store.degrade_after_failures,
            remote_timeout: Duration::from_millis(config.remote.timeout_ms),
        }
    }
}

/// Summary of a completed `load`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub user_id: UserId,
    pub records: usize,
    pub source: LoadSource,
    pub recovered_from_corrupt: bool,
}

/// Bookmarks of the signed-in user.
///
/// Mutations apply to memory synchronously and return an [`Applied`]; the
/// backend write runs on a background writer in mutation order. Queries
/// never suspend and are safe to call while rendering. Cloning yields
/// another handle to the same store.
///
/// Must be constructed inside a Tokio runtime.
///
/// 当前登录用户的书签存储：内存中同步变更，后台按顺序持久化。
#[derive(Clone)]
pub struct BookmarkStore {
    shared: Arc<Shared>,
    kv_store: Arc<dyn KeyValueStorePort>,
    writer: WriteQueue,
    mirror: Option<RemoteMirror>,
    lifecycle: Arc<tokio::sync::Mutex<()>>,
}

impl BookmarkStore {
    pub fn new(deps: BookmarkStoreDeps, config: BookmarkStoreConfig) -> Self {
        let BookmarkStoreDeps {
            kv_store,
            remote,
            clock,
        } = deps;

        let shared = Arc::new(Shared::new(clock, config.degrade_after_failures));
        let mirror = remote
            .map(|remote| RemoteMirror::new(remote, config.remote_timeout, shared.clone()));
        let writer = WriteQueue::spawn(shared.clone(), kv_store.clone(), mirror.clone());

        Self {
            shared,
            kv_store,
            writer,
            mirror,
            lifecycle: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Attach the store to `user_id` and load their collection.
    ///
    /// Writes still queued from an earlier session land before the key is
    /// read, and a pending remote push for this user is sent before the
    /// remote list is fetched.
    ///
    /// Never fails: a missing key gives an empty store, unreadable data is
    /// reported through [`last_error`](Self::last_error), and an unreachable
    /// remote leaves the local copy in place. A non-empty remote list
    /// replaces the local one unless the user already edited the store
    /// while the fetch was running.
    pub async fn load(&self, user_id: UserId) -> LoadReport {
        let span = info_span!("bookmarks.load", user_id = %user_id);
        async {
            let _lifecycle = self.lifecycle.lock().await;
            let key = storage_key(&user_id);

            let epoch = {
                let mut state = self.shared.lock();
                if let Some(previous) = state.reset() {
                    info!(previous_user = %previous.user_id, "Detached previous session before load");
                }
                state.epoch
            };

            // Writes queued by an earlier session may still target this key.
            self.writer.barrier().await;

            let mut last_error = None;
            let mut recovered_from_corrupt = false;
            let local = match self.kv_store.get(&key).await {
                Ok(Some(raw)) => match BookmarkCollection::from_json(&raw) {
                    Ok(collection) => collection,
                    Err(err) => {
                        warn!(key = %key, error = %err, "Stored bookmarks are corrupt, starting empty");
                        self.preserve_corrupt(&key, &raw).await;
                        last_error = Some(ErrorKind::CorruptState);
                        recovered_from_corrupt = true;
                        BookmarkCollection::new()
                    }
                },
                Ok(None) => BookmarkCollection::new(),
                Err(err) => {
                    warn!(key = %key, error = %err, "Failed to read stored bookmarks, starting empty");
                    last_error = Some(ErrorKind::PersistenceError);
                    BookmarkCollection::new()
                }
            };
            let mut source = if local.is_empty() {
                LoadSource::Empty
            } else {
                LoadSource::Local
            };

            let installed_revision = {
                let mut state = self.shared.lock();
                state.session = Some(Session {
                    user_id: user_id.clone(),
                    key,
                });
                state.records = local;
                state.loaded = true;
                state.last_error = last_error;
                state.revision
            };
            debug!(epoch, "Installed local bookmarks");

            if let Some(mirror) = &self.mirror {
                if self
                    .refresh_from_remote(mirror, &user_id, epoch, installed_revision)
                    .await
                {
                    source = LoadSource::Remote;
                }
            }

            let records = self.shared.lock().records.len();
            info!(records, source = ?source, recovered_from_corrupt, "Loaded bookmarks");
            self.shared.emit(StoreEvent::Loaded {
                user_id: user_id.clone(),
                records,
                source,
                recovered_from_corrupt,
            });

            LoadReport {
                user_id: user_id.clone(),
                records,
                source,
                recovered_from_corrupt,
            }
        }
        .instrument(span)
        .await
    }

    /// Adopt a non-empty remote list once the remote is caught up with this
    /// user's local edits. Returns whether the remote list was adopted.
    async fn refresh_from_remote(
        &self,
        mirror: &RemoteMirror,
        user_id: &UserId,
        epoch: u64,
        installed_revision: u64,
    ) -> bool {
        if !mirror.flush_user(user_id).await {
            warn!("Local bookmarks are not mirrored yet, keeping local copy");
            return false;
        }
        match mirror.fetch(user_id).await {
            Ok(Some(remote)) if !remote.is_empty() => {
                self.adopt_remote(epoch, installed_revision, remote)
            }
            Ok(_) => {
                debug!("Remote profile has no bookmarks, keeping local copy");
                false
            }
            Err(err) => {
                warn!(error = %err, "Remote profile unavailable, keeping local copy");
                self.shared.emit(StoreEvent::MirrorFailed {
                    user_id: user_id.clone(),
                    error: err.to_string(),
                });
                false
            }
        }
    }

    /// Replace the local collection with the remote one and re-persist it.
    fn adopt_remote(&self, epoch: u64, installed_revision: u64, remote: Vec<BookmarkRecord>) -> bool {
        let mut state = self.shared.lock();
        if state.epoch != epoch {
            return false;
        }
        if state.revision != installed_revision {
            warn!("Bookmarks changed during remote fetch, keeping local edits");
            return false;
        }
        let Some(session) = state.session.clone() else {
            return false;
        };
        state.records = BookmarkCollection::from_records(remote);
        // already mirrored: it came from the remote
        let _write = self.writer.enqueue(&state, session, false);
        debug!(records = state.records.len(), "Adopted remote bookmarks");
        true
    }

    async fn preserve_corrupt(&self, key: &str, raw: &str) {
        let backup_key = format!("{key}:corrupt");
        match self.kv_store.set(&backup_key, raw).await {
            Ok(()) => info!(key = %backup_key, "Preserved corrupt bookmark payload"),
            Err(err) => warn!(key = %backup_key, error = %err, "Failed to preserve corrupt payload"),
        }
    }

    /// Sign-out teardown: forget the in-memory collection and detach from
    /// the user's key. Persisted data is left alone, and queued writes and
    /// pending remote pushes still complete.
    pub async fn clear(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        let previous = self.shared.lock().reset();
        if let Some(session) = previous {
            info!(user_id = %session.user_id, "Cleared bookmark session");
            self.shared.emit(StoreEvent::Cleared {
                user_id: session.user_id,
            });
        }
    }

    /// App returned to the foreground: retry a pending remote mirror.
    ///
    /// Returns the outcome of the retry, or `None` if nothing was pending.
    pub async fn on_foreground(&self) -> Option<Result<(), BookmarkError>> {
        let mirror = self.mirror.as_ref()?;
        if !mirror.has_pending() {
            return None;
        }
        debug!("Retrying pending remote mirror on foreground");
        mirror.drain().await
    }

    /// Wait for the in-flight remote push, then push whatever is pending.
    ///
    /// Used before the process exits.
    pub async fn flush_mirror(&self) -> Option<Result<(), BookmarkError>> {
        self.mirror.as_ref()?.drain().await
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Bookmark `job`, or refresh the existing bookmark in place.
    ///
    /// A re-bookmark replaces the snapshot, deadline and notes but keeps the
    /// status and completed flag.
    pub fn add_bookmark(
        &self,
        job: JobRecord,
        deadline: Option<DateTime<Utc>>,
        notes: impl Into<String>,
    ) -> Result<Applied<BookmarkRecord>, BookmarkError> {
        let now = self.shared.clock.now();
        let mut state = self.shared.lock();
        let session = state.require_session()?;

        let (record, outcome) = state.records.upsert(job, deadline, notes.into(), now);
        let record = record.clone();
        debug!(
            user_id = %session.user_id,
            job_id = %record.job_id,
            inserted = outcome == Upsert::Inserted,
            "Bookmark saved"
        );

        let write = self.commit(&mut state, session);
        Ok(Applied::new(record, write))
    }

    /// Delete a bookmark. An absent id is `NotFound`.
    pub fn remove_bookmark(&self, job_id: &JobId) -> Result<Applied<()>, BookmarkError> {
        let mut state = self.shared.lock();
        let session = state.require_session()?;

        state
            .records
            .remove(job_id)
            .ok_or_else(|| BookmarkError::NotFound(job_id.clone()))?;
        debug!(user_id = %session.user_id, job_id = %job_id, "Bookmark removed");

        let write = self.commit(&mut state, session);
        Ok(Applied::new((), write))
    }

    /// Merge the fields present in `patch` into an existing bookmark.
    pub fn update_bookmark(
        &self,
        job_id: &JobId,
        patch: BookmarkPatch,
    ) -> Result<Applied<BookmarkRecord>, BookmarkError> {
        let now = self.shared.clock.now();
        let mut state = self.shared.lock();
        let session = state.require_session()?;

        let record = state
            .records
            .update(job_id, &patch, now)
            .cloned()
            .ok_or_else(|| BookmarkError::NotFound(job_id.clone()))?;
        debug!(user_id = %session.user_id, job_id = %job_id, patch = ?patch, "Bookmark updated");

        let write = self.commit(&mut state, session);
        Ok(Applied::new(record, write))
    }

    /// Shorthand for an `update_bookmark` that sets `completed`.
    pub fn mark_as_completed(&self, job_id: &JobId) -> Result<Applied<()>, BookmarkError> {
        self.update_bookmark(job_id, BookmarkPatch::new().completed(true))
            .map(|applied| applied.map(|_| ()))
    }

    /// Shorthand for an `update_bookmark` that clears `completed`.
    pub fn move_to_active(&self, job_id: &JobId) -> Result<Applied<()>, BookmarkError> {
        self.update_bookmark(job_id, BookmarkPatch::new().completed(false))
            .map(|applied| applied.map(|_| ()))
    }

    fn commit(
        &self,
        state: &mut StoreState,
        session: Session,
    ) -> tokio::sync::oneshot::Receiver<Result<(), BookmarkError>> {
        state.revision += 1;
        self.writer.enqueue(state, session, true)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn is_bookmarked(&self, job_id: &JobId) -> bool {
        self.shared.lock().records.contains(job_id)
    }

    pub fn get_bookmark(&self, job_id: &JobId) -> Option<BookmarkRecord> {
        self.shared.lock().records.get(job_id).cloned()
    }

    /// All bookmarks in insertion order.
    pub fn bookmarks(&self) -> Vec<BookmarkRecord> {
        self.shared.lock().records.records().to_vec()
    }

    pub fn active_bookmarks(&self) -> Vec<BookmarkRecord> {
        self.shared.lock().records.active().cloned().collect()
    }

    pub fn completed_bookmarks(&self) -> Vec<BookmarkRecord> {
        self.shared.lock().records.completed().cloned().collect()
    }

    /// Whole days until the record's deadline, measured from the store clock.
    pub fn days_until_deadline(&self, record: &BookmarkRecord) -> Option<i64> {
        days_until_deadline(record, self.shared.clock.now())
    }

    /// Deadline badges for active bookmarks, soonest first.
    pub fn deadline_indicators(&self) -> Vec<DeadlineIndicator> {
        let now = self.shared.clock.now();
        self.shared.lock().records.deadline_indicators(now)
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.shared
            .lock()
            .session
            .as_ref()
            .map(|session| session.user_id.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.shared.lock().loaded
    }

    /// Most recent local failure of this session: `CorruptState` or
    /// `PersistenceError`. Reset by `load` and `clear`.
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.shared.lock().last_error
    }

    pub fn is_degraded(&self) -> bool {
        self.shared.lock().degraded
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.shared.subscribe()
    }
}
