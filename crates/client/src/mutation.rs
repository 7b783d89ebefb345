//! Mutation lifecycle: one in-flight call per handle, invalidation on
//! success, user-facing message on failure.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::cache::{Invalidation, QueryCache, QueryKey};
use crate::error::{ApiError, MutationError};

/// A named write operation.
///
/// While a call is in flight the handle is pending and further calls are
/// refused with [`MutationError::AlreadyPending`] without reaching the
/// network, which is what a view's disabled submit button relies on.
#[derive(Debug)]
pub struct Mutation {
    name: &'static str,
    success: &'static str,
    failure: &'static str,
    pending: AtomicBool,
}

/// Clears the pending flag when the call finishes or is dropped.
struct PendingGuard<'a>(&'a AtomicBool);

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Mutation {
    /// `success` is shown when the call succeeds; `failure` when it fails
    /// and the server gave no message.
    #[must_use]
    pub const fn new(name: &'static str, success: &'static str, failure: &'static str) -> Self {
        Self {
            name,
            success,
            failure,
            pending: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn success_message(&self) -> &'static str {
        self.success
    }

    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        self.failure
    }

    /// Whether a call is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Run `call`. On success, invalidate `invalidates` before returning.
    /// On failure nothing is invalidated.
    ///
    /// # Errors
    ///
    /// [`MutationError::AlreadyPending`] if a call is in flight, or
    /// [`MutationError::Failed`] carrying the server's message (or the
    /// fallback) if `call` fails.
    pub async fn run<T, F>(
        &self,
        cache: &QueryCache,
        invalidates: &[QueryKey],
        call: F,
    ) -> Result<(T, Invalidation), MutationError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let Some(_guard) = PendingGuard::acquire(&self.pending) else {
            warn!(mutation = self.name, "Mutation already in progress");
            return Err(MutationError::AlreadyPending(self.name));
        };

        match call.await {
            Ok(value) => {
                let invalidation = cache.invalidate(invalidates).await;
                info!(
                    mutation = self.name,
                    evicted = invalidation.evicted.len(),
                    notified = invalidation.notified.len(),
                    "Mutation succeeded"
                );
                Ok((value, invalidation))
            }
            Err(error) => {
                warn!(mutation = self.name, error = %error, "Mutation failed");
                Err(MutationError::Failed {
                    message: error.user_message(self.failure),
                    source: error,
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use lunchdesk_core::{Page, Pagination};

    use super::*;

    fn create() -> Mutation {
        Mutation::new(
            "create_location",
            "Location created successfully",
            "Failed to create location",
        )
    }

    fn cache() -> QueryCache {
        QueryCache::new(100, Duration::from_secs(60))
    }

    async fn seed(cache: &QueryCache, key: &QueryKey) {
        cache
            .fetch(key, async {
                Ok(Page::<lunchdesk_core::Location>::new(vec![], Pagination::for_total(1, 10, 0)).unwrap())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_success_invalidates_declared_prefixes() {
        let cache = cache();
        let key = QueryKey::locations(1, 10);
        seed(&cache, &key).await;

        let mutation = create();
        let (value, invalidation) = mutation
            .run(&cache, &[QueryKey::all_locations()], async { Ok(5) })
            .await
            .unwrap();

        assert_eq!(value, 5);
        assert_eq!(invalidation.evicted, vec![key.clone()]);
        assert!(!cache.contains(&key));
        assert!(!mutation.is_pending());
    }

    #[tokio::test]
    async fn test_failure_keeps_cache_and_uses_server_message() {
        let cache = cache();
        let key = QueryKey::locations(1, 10);
        seed(&cache, &key).await;

        let mutation = create();
        let err = mutation
            .run::<(), _>(&cache, &[QueryKey::all_locations()], async {
                Err(ApiError::Api {
                    status: 409,
                    message: Some("Location already exists".to_string()),
                })
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Location already exists");
        assert!(cache.contains(&key));
        assert!(!mutation.is_pending());
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_fallback() {
        let mutation = create();
        let err = mutation
            .run::<(), _>(&cache(), &[], async {
                Err(ApiError::Api {
                    status: 500,
                    message: None,
                })
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to create location");
    }

    #[tokio::test]
    async fn test_second_call_while_pending_is_refused() {
        let cache = cache();
        let mutation = create();
        let (release, wait) = tokio::sync::oneshot::channel::<()>();

        let first = mutation.run(&cache, &[], async {
            wait.await.ok();
            Ok(1)
        });
        let second = async {
            tokio::task::yield_now().await;
            assert!(mutation.is_pending());
            let refused = mutation.run(&cache, &[], async { Ok(2) }).await;
            release.send(()).ok();
            refused
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap().0, 1);
        assert!(matches!(second, Err(MutationError::AlreadyPending("create_location"))));
        assert!(!mutation.is_pending());
    }
}
