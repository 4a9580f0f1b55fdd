//! The memoization slot carried by every descriptor handle.

use futures::future::{self, BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

use crate::ResolveError;

/// A resolution that may still be in flight
///
/// Every clone observes the same underlying work, so awaiting a
/// [Resolution] from several places only performs that work once.
pub type Resolution<T> = Shared<BoxFuture<'static, Result<T, ResolveError>>>;

/// A slot that holds at most one [Resolution]
///
/// The first call to [Memo::get_or_start] stores the [Resolution] it
/// creates before anyone can await it; every later call returns a clone of
/// that stored [Resolution], whether it is still pending or has settled.
pub struct Memo<T>
where
    T: Clone,
{
    slot: Mutex<Option<Resolution<T>>>,
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty [Memo]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the stored [Resolution], or store and return the one produced
    /// by `start`
    ///
    /// `start` must only construct the future, not drive it; it runs while
    /// the slot is locked.
    pub fn get_or_start<F>(&self, start: F) -> Resolution<T>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, ResolveError>>,
    {
        let mut slot = self.slot.lock();
        if let Some(resolution) = slot.as_ref() {
            tracing::trace!("Reusing memoized resolution");
            return resolution.clone();
        }
        let resolution = start().shared();
        *slot = Some(resolution.clone());
        resolution
    }

    /// Replace whatever is stored with a [Resolution] that is already
    /// settled to `value`
    pub fn settle(&self, value: T) {
        let resolution = future::ready(Ok(value)).boxed().shared();
        *self.slot.lock() = Some(resolution);
    }

    /// Whether resolution has been started (or settled)
    pub fn is_started(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<T> Default for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn it_starts_resolution_only_once() -> anyhow::Result<()> {
        let memo = Memo::<usize>::new();
        let starts = Arc::new(AtomicUsize::new(0));

        let start = || {
            let starts = starts.clone();
            move || {
                starts.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }.boxed()
            }
        };

        let first = memo.get_or_start(start());
        let second = memo.get_or_start(start());

        assert!(first.ptr_eq(&second));
        assert_eq!(first.await?, 42);
        assert_eq!(second.await?, 42);
        assert_eq!(starts.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn it_shares_failures() {
        let memo = Memo::<usize>::new();

        let resolution = memo.get_or_start(|| {
            async {
                Err(ResolveError::MissingIdentifyingProperty {
                    target: "this subject",
                })
            }
            .boxed()
        });

        assert!(resolution.clone().await.is_err());
        assert!(memo.get_or_start(|| async { Ok(1) }.boxed()).await.is_err());
    }

    #[tokio::test]
    async fn it_can_be_settled_to_a_new_value() -> anyhow::Result<()> {
        let memo = Memo::<usize>::new();
        assert!(!memo.is_started());

        memo.get_or_start(|| async { Ok(1) }.boxed()).await?;
        memo.settle(2);

        assert!(memo.is_started());
        assert_eq!(memo.get_or_start(|| async { Ok(3) }.boxed()).await?, 2);
        Ok(())
    }
}
