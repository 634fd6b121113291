//! Best-effort replication of the collection to the remote profile.
//!
//! Only the newest snapshot per user is kept pending and at most one remote
//! call is in flight. A failed push stays pending until a newer snapshot
//! replaces it or the host retries on foreground. Pending snapshots survive
//! sign-out.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info_span, warn, Instrument};

use jt_core::bookmark::{BookmarkError, BookmarkRecord};
use jt_core::ids::UserId;
use jt_core::ports::{RemoteProfileError, RemoteProfilePort};

use super::events::StoreEvent;
use super::state::Shared;

pub(crate) struct MirrorJob {
    pub user_id: UserId,
    pub records: Vec<BookmarkRecord>,
}

#[derive(Clone)]
pub(crate) struct RemoteMirror {
    inner: Arc<MirrorInner>,
}

struct MirrorInner {
    remote: Arc<dyn RemoteProfilePort>,
    timeout: Duration,
    shared: Arc<Shared>,
    pending: Mutex<BTreeMap<UserId, MirrorJob>>,
    in_flight: tokio::sync::Mutex<()>,
}

impl RemoteMirror {
    pub fn new(remote: Arc<dyn RemoteProfilePort>, timeout: Duration, shared: Arc<Shared>) -> Self {
        Self {
            inner: Arc::new(MirrorInner {
                remote,
                timeout,
                shared,
                pending: Mutex::new(BTreeMap::new()),
                in_flight: tokio::sync::Mutex::new(()),
            }),
        }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.inner.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Fetch the remote list, bounded by the mirror timeout.
    pub async fn fetch(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Vec<BookmarkRecord>>, RemoteProfileError> {
        match tokio::time::timeout(self.inner.timeout, self.inner.remote.get_bookmarks(user_id))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(RemoteProfileError::Timeout(self.timeout_ms())),
        }
    }

    /// Replace the user's pending snapshot and start a push in the background.
    pub fn schedule(&self, job: MirrorJob) {
        self.lock_pending().insert(job.user_id.clone(), job);
        let this = self.clone();
        tokio::spawn(async move {
            this.drain().await;
        });
    }

    pub fn has_pending(&self) -> bool {
        !self.lock_pending().is_empty()
    }

    /// Push every pending snapshot, one user at a time.
    ///
    /// Returns `None` when nothing was pending, otherwise the first failure
    /// or `Ok`.
    pub async fn drain(&self) -> Option<Result<(), BookmarkError>> {
        let _in_flight = self.inner.in_flight.lock().await;

        let jobs = std::mem::take(&mut *self.lock_pending());
        let mut outcome = None;
        for job in jobs.into_values() {
            let pushed = self.push_job(job).await;
            outcome = match outcome {
                Some(Err(err)) => Some(Err(err)),
                _ => Some(pushed),
            };
        }
        outcome
    }

    /// Wait for the push in flight, then push `user_id`'s pending snapshot.
    ///
    /// Returns `false` while the remote is still behind the local copy.
    pub async fn flush_user(&self, user_id: &UserId) -> bool {
        let _in_flight = self.inner.in_flight.lock().await;

        let job = self.lock_pending().remove(user_id);
        match job {
            Some(job) => self.push_job(job).await.is_ok(),
            None => true,
        }
    }

    /// Push one snapshot. A failure is re-queued unless a newer snapshot of
    /// the same user arrived meanwhile.
    ///
    /// Jobs outlive the session that produced them; events are only emitted
    /// while their user is attached.
    async fn push_job(&self, job: MirrorJob) -> Result<(), BookmarkError> {
        let span = info_span!(
            "bookmarks.mirror",
            user_id = %job.user_id,
            records = job.records.len()
        );
        let outcome = self.push(&job).instrument(span).await;
        let attached = self.inner.shared.is_attached_to(&job.user_id);

        match &outcome {
            Ok(()) => {
                debug!(user_id = %job.user_id, records = job.records.len(), "Mirrored bookmarks");
                if attached {
                    self.inner.shared.emit(StoreEvent::Mirrored {
                        user_id: job.user_id.clone(),
                        records: job.records.len(),
                    });
                }
            }
            Err(err) => {
                warn!(user_id = %job.user_id, error = %err, "Remote mirror failed, will retry");
                let user_id = job.user_id.clone();
                self.lock_pending().entry(user_id.clone()).or_insert(job);
                if attached {
                    self.inner.shared.emit(StoreEvent::MirrorFailed {
                        user_id,
                        error: err.to_string(),
                    });
                }
            }
        }
        outcome
    }

    async fn push(&self, job: &MirrorJob) -> Result<(), BookmarkError> {
        let call = self.inner.remote.put_bookmarks(&job.user_id, &job.records);
        match tokio::time::timeout(self.inner.timeout, call).await {
            Ok(Ok(response)) if response.success => Ok(()),
            Ok(Ok(response)) => Err(BookmarkError::RemoteMirror(
                response
                    .error
                    .unwrap_or_else(|| "remote rejected the bookmark list".to_string()),
            )),
            Ok(Err(err)) => Err(BookmarkError::RemoteMirror(err.to_string())),
            Err(_) => Err(BookmarkError::RemoteMirror(
                RemoteProfileError::Timeout(self.timeout_ms()).to_string(),
            )),
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, BTreeMap<UserId, MirrorJob>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
