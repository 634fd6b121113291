//! Fixtures shared by the jt-app integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::{broadcast, Semaphore};

use jt_app::{BookmarkStore, BookmarkStoreConfig, BookmarkStoreDeps, StoreEvent};
use jt_core::bookmark::{BookmarkCollection, BookmarkRecord};
use jt_core::ids::UserId;
use jt_core::ports::{
    ClockPort, KeyValueStoreError, KeyValueStorePort, RemoteProfileError, RemoteProfilePort,
    RemotePutResponse,
};
use jt_infra::MemoryKeyValueStore;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

/// Clock that only moves when told to.
pub struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(now)))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now = *now + by;
    }
}

impl ClockPort for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Memory store whose reads and writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryKeyValueStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStorePort for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KeyValueStoreError::Unavailable("storage offline".into()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeyValueStoreError::QuotaExceeded("disk full".into()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.inner.remove(key).await
    }
}

/// Memory store whose writes wait for a permit and are logged in order.
pub struct GatedStore {
    pub inner: MemoryKeyValueStore,
    pub gate: Semaphore,
    pub writes: Mutex<Vec<(String, String)>>,
}

impl GatedStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryKeyValueStore::new(),
            gate: Semaphore::new(0),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn open(&self, writes: usize) {
        self.gate.add_permits(writes);
    }

    pub fn written(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyValueStorePort for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        self.gate
            .acquire()
            .await
            .map_err(|e| KeyValueStoreError::Other(e.to_string()))?
            .forget();
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        self.inner.remove(key).await
    }
}

/// Remote whose calls never finish within any reasonable timeout.
pub struct StalledRemote;

#[async_trait]
impl RemoteProfilePort for StalledRemote {
    async fn get_bookmarks(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<Vec<BookmarkRecord>>, RemoteProfileError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn put_bookmarks(
        &self,
        _user_id: &UserId,
        _bookmarks: &[BookmarkRecord],
    ) -> Result<RemotePutResponse, RemoteProfileError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(RemotePutResponse::ok())
    }
}

/// Remote whose fetch waits until `release` is notified.
pub struct HeldRemote {
    pub release: tokio::sync::Notify,
    served: Vec<BookmarkRecord>,
}

impl HeldRemote {
    pub fn new(served: Vec<BookmarkRecord>) -> Self {
        Self {
            release: tokio::sync::Notify::new(),
            served,
        }
    }
}

#[async_trait]
impl RemoteProfilePort for HeldRemote {
    async fn get_bookmarks(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<Vec<BookmarkRecord>>, RemoteProfileError> {
        self.release.notified().await;
        Ok(Some(self.served.clone()))
    }

    async fn put_bookmarks(
        &self,
        _user_id: &UserId,
        _bookmarks: &[BookmarkRecord],
    ) -> Result<RemotePutResponse, RemoteProfileError> {
        Ok(RemotePutResponse::ok())
    }
}

/// Remote that serves back the last list put for each user.
#[derive(Default)]
pub struct EchoRemote {
    lists: Mutex<HashMap<UserId, Vec<BookmarkRecord>>>,
}

impl EchoRemote {
    pub fn seeded(user: &str, records: Vec<BookmarkRecord>) -> Self {
        let remote = Self::default();
        remote
            .lists
            .lock()
            .unwrap()
            .insert(UserId::from(user), records);
        remote
    }

    pub fn list(&self, user: &str) -> Option<Vec<BookmarkRecord>> {
        self.lists.lock().unwrap().get(&UserId::from(user)).cloned()
    }
}

#[async_trait]
impl RemoteProfilePort for EchoRemote {
    async fn get_bookmarks(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Vec<BookmarkRecord>>, RemoteProfileError> {
        Ok(self.lists.lock().unwrap().get(user_id).cloned())
    }

    async fn put_bookmarks(
        &self,
        user_id: &UserId,
        bookmarks: &[BookmarkRecord],
    ) -> Result<RemotePutResponse, RemoteProfileError> {
        self.lists
            .lock()
            .unwrap()
            .insert(user_id.clone(), bookmarks.to_vec());
        Ok(RemotePutResponse::ok())
    }
}

pub fn ids(records: &[BookmarkRecord]) -> Vec<String> {
    records.iter().map(|r| r.job_id.as_str().to_string()).collect()
}

mockall::mock! {
    pub Remote {}

    #[async_trait]
    impl RemoteProfilePort for Remote {
        async fn get_bookmarks(
            &self,
            user_id: &UserId,
        ) -> Result<Option<Vec<BookmarkRecord>>, RemoteProfileError>;

        async fn put_bookmarks(
            &self,
            user_id: &UserId,
            bookmarks: &[BookmarkRecord],
        ) -> Result<RemotePutResponse, RemoteProfileError>;
    }
}

pub fn store_with(
    kv_store: Arc<dyn KeyValueStorePort>,
    remote: Option<Arc<dyn RemoteProfilePort>>,
    clock: Arc<dyn ClockPort>,
) -> BookmarkStore {
    store_with_timeout(kv_store, remote, clock, Duration::from_millis(200))
}

pub fn store_with_timeout(
    kv_store: Arc<dyn KeyValueStorePort>,
    remote: Option<Arc<dyn RemoteProfilePort>>,
    clock: Arc<dyn ClockPort>,
    remote_timeout: Duration,
) -> BookmarkStore {
    BookmarkStore::new(
        BookmarkStoreDeps {
            kv_store,
            remote,
            clock,
        },
        BookmarkStoreConfig {
            degrade_after_failures: 3,
            remote_timeout,
        },
    )
}

pub fn decode(raw: &str) -> Vec<BookmarkRecord> {
    BookmarkCollection::from_json(raw)
        .expect("persisted payload decodes")
        .records()
        .to_vec()
}

/// Wait for the first event matching `pred`, skipping others.
pub async fn wait_for_event(
    events: &mut broadcast::Receiver<StoreEvent>,
    pred: impl Fn(&StoreEvent) -> bool,
) -> StoreEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Ok(event) if pred(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for store event")
}

/// Poll `cond` until it holds.
pub async fn eventually(what: &str, cond: impl Fn() -> bool) {
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "timed out waiting for: {what}");
}
