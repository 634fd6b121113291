mod coordinator;

pub use coordinator::SessionCoordinator;
