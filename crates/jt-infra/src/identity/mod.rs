mod watch_identity;

pub use watch_identity::WatchIdentityProvider;
