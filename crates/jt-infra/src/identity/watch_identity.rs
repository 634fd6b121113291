use tokio::sync::watch;
use tracing::info;

use jt_core::ids::UserId;
use jt_core::ports::IdentityProviderPort;

/// Identity provider backed by a watch channel.
///
/// The host's auth flow calls [`sign_in`](Self::sign_in) and
/// [`sign_out`](Self::sign_out); subscribers see every change.
#[derive(Debug)]
pub struct WatchIdentityProvider {
    tx: watch::Sender<Option<UserId>>,
}

impl WatchIdentityProvider {
    pub fn new(initial: Option<UserId>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn sign_in(&self, user_id: UserId) {
        info!(user_id = %user_id, "User signed in");
        self.tx.send_replace(Some(user_id));
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.tx.send_replace(None) {
            info!(user_id = %previous, "User signed out");
        }
    }
}

impl Default for WatchIdentityProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl IdentityProviderPort for WatchIdentityProvider {
    fn current_user_id(&self) -> Option<UserId> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.tx.subscribe()
    }
}
