use tokio::sync::watch;

use crate::ids::UserId;

/// Source of the signed-in user.
///
/// 当前登录用户来源端口。
pub trait IdentityProviderPort: Send + Sync {
    /// The user signed in right now, if any.
    fn current_user_id(&self) -> Option<UserId>;

    /// Receiver that observes every sign-in and sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<UserId>>;
}
