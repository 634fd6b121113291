use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, Instrument};

use jt_core::ids::UserId;
use jt_core::ports::IdentityProviderPort;

use crate::bookmarks::{BookmarkStore, LoadReport};

/// Keeps the bookmark store attached to whoever is signed in.
///
/// Sign-in loads the user's collection, sign-out clears memory, and a
/// direct switch from one user to another clears the first before the
/// second is loaded.
///
/// 根据登录状态驱动书签存储的加载与清理。
pub struct SessionCoordinator {
    store: BookmarkStore,
    identity: Arc<dyn IdentityProviderPort>,
}

impl SessionCoordinator {
    pub fn new(store: BookmarkStore, identity: Arc<dyn IdentityProviderPort>) -> Self {
        Self { store, identity }
    }

    pub fn store(&self) -> &BookmarkStore {
        &self.store
    }

    /// Align the store with the identity provider's current user.
    ///
    /// Returns the load report when a user was loaded.
    pub async fn sync_now(&self) -> Option<LoadReport> {
        self.apply(self.identity.current_user_id()).await
    }

    async fn apply(&self, target: Option<UserId>) -> Option<LoadReport> {
        let attached = self.store.current_user();
        if attached == target {
            debug!("Bookmark session already matches identity");
            return None;
        }
        if attached.is_some() {
            self.store.clear().await;
        }
        match target {
            Some(user_id) => Some(self.store.load(user_id).await),
            None => None,
        }
    }

    /// Follow identity changes until the provider goes away.
    pub fn spawn(self) -> JoinHandle<()> {
        let mut changes = self.identity.subscribe();
        tokio::spawn(
            async move {
                loop {
                    let target = changes.borrow_and_update().clone();
                    match &target {
                        Some(user_id) => info!(user_id = %user_id, "Identity changed: signed in"),
                        None => info!("Identity changed: signed out"),
                    }
                    self.apply(target).await;
                    if changes.changed().await.is_err() {
                        debug!("Identity provider closed, stopping session coordinator");
                        break;
                    }
                }
            }
            .instrument(info_span!("bookmarks.session")),
        )
    }
}
