//! FIFO writer for local persistence.
//!
//! Mutations enqueue a full snapshot while holding the state lock, so
//! writes reach the backend in mutation order and the last write always
//! carries the latest state. A barrier resolves once every write queued
//! before it has reached the backend.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info_span, Instrument};

use jt_core::bookmark::{BookmarkError, BookmarkRecord};
use jt_core::ports::KeyValueStorePort;

use super::mirror::{MirrorJob, RemoteMirror};
use super::state::{Session, Shared, StoreState};

pub(crate) struct WriteJob {
    epoch: u64,
    session: Session,
    payload: Result<String, BookmarkError>,
    records: Vec<BookmarkRecord>,
    mirror: bool,
    done: oneshot::Sender<Result<(), BookmarkError>>,
}

enum WriterMessage {
    Write(WriteJob),
    Barrier(oneshot::Sender<()>),
}

#[derive(Clone)]
pub(crate) struct WriteQueue {
    tx: mpsc::UnboundedSender<WriterMessage>,
}

impl WriteQueue {
    /// Start the writer task. Requires a Tokio runtime.
    pub fn spawn(
        shared: Arc<Shared>,
        kv_store: Arc<dyn KeyValueStorePort>,
        mirror: Option<RemoteMirror>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(rx, shared, kv_store, mirror));
        Self { tx }
    }

    /// Snapshot `state` and queue it for `session`.
    ///
    /// Call with the state lock held so queue order matches mutation order.
    pub fn enqueue(
        &self,
        state: &StoreState,
        session: Session,
        mirror: bool,
    ) -> oneshot::Receiver<Result<(), BookmarkError>> {
        let (done, rx) = oneshot::channel();
        let payload = state
            .records
            .to_json()
            .map_err(|e| BookmarkError::Persistence(format!("failed to serialize bookmarks: {e}")));
        let job = WriteJob {
            epoch: state.epoch,
            session,
            payload,
            records: state.records.records().to_vec(),
            mirror,
            done,
        };
        if let Err(mpsc::error::SendError(WriterMessage::Write(job))) =
            self.tx.send(WriterMessage::Write(job))
        {
            let _ = job.done.send(Err(BookmarkError::Persistence(
                "bookmark writer is not running".to_string(),
            )));
        }
        rx
    }

    /// Wait until every write queued so far has been attempted.
    ///
    /// Mirror snapshots of those writes are scheduled by the time this
    /// returns. Returns immediately if the writer has stopped.
    pub async fn barrier(&self) {
        let (done, rx) = oneshot::channel();
        if self.tx.send(WriterMessage::Barrier(done)).is_ok() {
            let _ = rx.await;
        }
    }
}

async fn run_writer(
    mut rx: mpsc::UnboundedReceiver<WriterMessage>,
    shared: Arc<Shared>,
    kv_store: Arc<dyn KeyValueStorePort>,
    mirror: Option<RemoteMirror>,
) {
    while let Some(message) = rx.recv().await {
        let job = match message {
            WriterMessage::Write(job) => job,
            WriterMessage::Barrier(done) => {
                let _ = done.send(());
                continue;
            }
        };
        let WriteJob {
            epoch,
            session,
            payload,
            records,
            mirror: mirror_after,
            done,
        } = job;

        let span = info_span!(
            "bookmarks.persist",
            user_id = %session.user_id,
            key = %session.key,
            epoch
        );
        let outcome = async {
            let raw = payload?;
            kv_store
                .set(&session.key, &raw)
                .await
                .map_err(|e| BookmarkError::Persistence(e.to_string()))?;
            debug!(records = records.len(), bytes = raw.len(), "Persisted bookmarks");
            Ok::<(), BookmarkError>(())
        }
        .instrument(span)
        .await;

        shared.record_write_outcome(epoch, &session.user_id, &outcome);

        // The mirror runs after every local attempt, including failed ones.
        if mirror_after {
            if let Some(mirror) = &mirror {
                mirror.schedule(MirrorJob {
                    user_id: session.user_id.clone(),
                    records,
                });
            }
        }

        let _ = done.send(outcome);
    }
    debug!("Bookmark writer stopped");
}
