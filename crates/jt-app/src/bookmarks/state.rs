use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{info, warn};

use jt_core::bookmark::{BookmarkCollection, BookmarkError, ErrorKind};
use jt_core::ids::UserId;
use jt_core::ports::ClockPort;

use super::events::StoreEvent;

const EVENT_CAPACITY: usize = 64;

/// The user the store is currently attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    pub user_id: UserId,
    pub key: String,
}

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub session: Option<Session>,
    pub records: BookmarkCollection,
    pub loaded: bool,
    pub last_error: Option<ErrorKind>,
    pub consecutive_failures: u32,
    pub degraded: bool,
    /// Bumped by every load and clear.
    pub epoch: u64,
    /// Bumped by every mutation.
    pub revision: u64,
}

impl StoreState {
    pub fn require_session(&self) -> Result<Session, BookmarkError> {
        self.session.clone().ok_or(BookmarkError::NoActiveSession)
    }

    /// Detach from the current user and start a new epoch.
    pub fn reset(&mut self) -> Option<Session> {
        self.epoch += 1;
        self.records.clear();
        self.loaded = false;
        self.last_error = None;
        self.consecutive_failures = 0;
        self.degraded = false;
        self.session.take()
    }
}

/// State shared by the store handle, the writer task and the mirror.
pub(crate) struct Shared {
    state: Mutex<StoreState>,
    events: broadcast::Sender<StoreEvent>,
    pub clock: Arc<dyn ClockPort>,
    pub degrade_after_failures: u32,
}

impl Shared {
    pub fn new(clock: Arc<dyn ClockPort>, degrade_after_failures: u32) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(StoreState::default()),
            events,
            clock,
            degrade_after_failures: degrade_after_failures.max(1),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn emit(&self, event: StoreEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Whether the store is attached to `user_id` right now.
    pub fn is_attached_to(&self, user_id: &UserId) -> bool {
        self.lock()
            .session
            .as_ref()
            .is_some_and(|session| &session.user_id == user_id)
    }

    /// Fold the outcome of a local write into the failure counters.
    ///
    /// Outcomes from an earlier epoch are ignored.
    pub fn record_write_outcome(
        &self,
        epoch: u64,
        user_id: &UserId,
        outcome: &Result<(), BookmarkError>,
    ) {
        let mut events = Vec::new();
        {
            let mut state = self.lock();
            if state.epoch != epoch {
                return;
            }
            match outcome {
                Ok(()) => {
                    state.consecutive_failures = 0;
                    if state.degraded {
                        state.degraded = false;
                        info!(user_id = %user_id, "Bookmark persistence recovered");
                        events.push(StoreEvent::PersistenceRecovered {
                            user_id: user_id.clone(),
                        });
                    }
                }
                Err(err) => {
                    state.consecutive_failures += 1;
                    state.last_error = Some(err.kind());
                    warn!(
                        user_id = %user_id,
                        consecutive_failures = state.consecutive_failures,
                        error = %err,
                        "Failed to persist bookmarks"
                    );
                    events.push(StoreEvent::PersistFailed {
                        user_id: user_id.clone(),
                        error: err.to_string(),
                    });
                    if !state.degraded
                        && state.consecutive_failures >= self.degrade_after_failures
                    {
                        state.degraded = true;
                        warn!(
                            user_id = %user_id,
                            consecutive_failures = state.consecutive_failures,
                            "Bookmark persistence degraded, continuing in memory"
                        );
                        events.push(StoreEvent::PersistenceDegraded {
                            user_id: user_id.clone(),
                            consecutive_failures: state.consecutive_failures,
                        });
                    }
                }
            }
        }
        for event in events {
            self.emit(event);
        }
    }
}
