use tokio::sync::oneshot;

use jt_core::bookmark::BookmarkError;

/// Result of an optimistic mutation.
///
/// The value reflects the in-memory state right after the mutation and is
/// usable immediately. The local write runs in the background;
/// [`Applied::durable`] waits for that specific write.
#[derive(Debug)]
#[must_use = "the mutation already happened; use `value`, `into_value` or `durable`"]
pub struct Applied<T> {
    value: T,
    write: oneshot::Receiver<Result<(), BookmarkError>>,
}

impl<T> Applied<T> {
    pub(crate) fn new(value: T, write: oneshot::Receiver<Result<(), BookmarkError>>) -> Self {
        Self { value, write }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the value without waiting for the write.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Wait for this mutation's local write.
    ///
    /// Returns `PersistenceError` if the backend rejected it. The in-memory
    /// state keeps the mutation either way.
    pub async fn durable(self) -> Result<T, BookmarkError> {
        let Applied { value, write } = self;
        match write.await {
            Ok(Ok(())) => Ok(value),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(BookmarkError::Persistence(
                "write queue shut down before the write completed".to_string(),
            )),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Applied<U> {
        Applied {
            value: f(self.value),
            write: self.write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_durable_reports_write_result() {
        let (tx, rx) = oneshot::channel();
        let applied = Applied::new(7, rx);
        assert_eq!(*applied.value(), 7);
        tx.send(Ok(())).unwrap();
        assert_eq!(applied.durable().await, Ok(7));

        let (tx, rx) = oneshot::channel();
        let applied = Applied::new("x", rx).map(|v| v.len());
        tx.send(Err(BookmarkError::Persistence("disk full".into())))
            .unwrap();
        assert_eq!(
            applied.durable().await,
            Err(BookmarkError::Persistence("disk full".into()))
        );
    }

    #[tokio::test]
    async fn test_dropped_writer_is_a_persistence_error() {
        let (tx, rx) = oneshot::channel::<Result<(), BookmarkError>>();
        drop(tx);
        let err = Applied::new((), rx).durable().await.unwrap_err();
        assert_eq!(err.kind(), jt_core::ErrorKind::PersistenceError);
    }
}
