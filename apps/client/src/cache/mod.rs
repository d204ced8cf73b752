//! Process-wide query cache keyed by typed (operation, arguments) pairs.
//!
//! Contract per key: the first read (or the first after an invalidation)
//! runs its fetch exactly once, even under concurrent access; the stored
//! result, success or failure, serves every later read until the key is
//! invalidated. Failures are never retried implicitly.
//!
//! `invalidate`, `invalidate_operation` and `clear` are the only mutation
//! surface. Multi-key invalidation is not transactional: keys become stale
//! one at a time.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::models::{FilterCriteria, JobId, Principal};
use crate::service::{ServiceError, ServiceErrorKind};

/// Backend operation a cache key belongs to. Discriminant of [`CacheKey`];
/// the unit of prefix-style invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    JobPostings,
    FilteredJobPostings,
    JobApplications,
    UserApplications,
    CallerCandidateProfile,
    CandidateProfile,
    Candidates,
    CallerUserProfile,
    UserProfile,
    CallerUserRole,
    CompiledCv,
}

/// Typed (operation, arguments) cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    JobPostings,
    FilteredJobPostings(FilterCriteria),
    JobApplications(JobId),
    UserApplications(Principal),
    CallerCandidateProfile,
    CandidateProfile(Principal),
    Candidates {
        skills: Vec<String>,
        min_experience: u64,
    },
    CallerUserProfile,
    UserProfile(Principal),
    CallerUserRole,
    CompiledCv,
}

impl CacheKey {
    pub fn operation(&self) -> Operation {
        match self {
            CacheKey::JobPostings => Operation::JobPostings,
            CacheKey::FilteredJobPostings(_) => Operation::FilteredJobPostings,
            CacheKey::JobApplications(_) => Operation::JobApplications,
            CacheKey::UserApplications(_) => Operation::UserApplications,
            CacheKey::CallerCandidateProfile => Operation::CallerCandidateProfile,
            CacheKey::CandidateProfile(_) => Operation::CandidateProfile,
            CacheKey::Candidates { .. } => Operation::Candidates,
            CacheKey::CallerUserProfile => Operation::CallerUserProfile,
            CacheKey::UserProfile(_) => Operation::UserProfile,
            CacheKey::CallerUserRole => Operation::CallerUserRole,
            CacheKey::CompiledCv => Operation::CompiledCv,
        }
    }
}

/// Clone-able record of a failed fetch, stored under the key that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl From<ServiceError> for QueryError {
    fn from(err: ServiceError) -> Self {
        QueryError {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Tri-state query result handed to presentation code.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Connection not established, or (via `peek`) a fetch still in flight.
    Pending,
    Ready(T),
    Failed(QueryError),
}

impl<T> QueryState<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            QueryState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Empty-collection / absent-value default until the fetch completes,
    /// matching how pages render a first load.
    pub fn value_or_default(self) -> T
    where
        T: Default,
    {
        self.ready().unwrap_or_default()
    }

    /// Combines two query results for pages that join collections: pending
    /// if either side is, failed on the first failure, ready otherwise.
    pub fn zip<U>(self, other: QueryState<U>) -> QueryState<(T, U)> {
        match (self, other) {
            (QueryState::Failed(err), _) | (_, QueryState::Failed(err)) => {
                QueryState::Failed(err)
            }
            (QueryState::Pending, _) | (_, QueryState::Pending) => QueryState::Pending,
            (QueryState::Ready(a), QueryState::Ready(b)) => QueryState::Ready((a, b)),
        }
    }
}

type StoredResult = Result<Arc<dyn Any + Send + Sync>, QueryError>;
type Slot = Arc<OnceCell<StoredResult>>;

/// Process-wide query cache. Shared by all pages; any page may read or
/// invalidate any key.
#[derive(Default)]
pub struct QueryCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, running `fetch` exactly once per
    /// (key, generation): concurrent first reads share a single in-flight
    /// fetch, and a stored failure is returned as-is until the key is
    /// invalidated.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: CacheKey, fetch: F) -> QueryState<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap();
            slots.entry(key.clone()).or_default().clone()
        };

        let stored = slot
            .get_or_init(|| async {
                debug!("cache fetch: {key:?}");
                match fetch().await {
                    Ok(value) => Ok(Arc::new(value) as Arc<dyn Any + Send + Sync>),
                    Err(err) => {
                        warn!("cache fetch failed for {key:?}: {err}");
                        Err(QueryError::from(err))
                    }
                }
            })
            .await;

        match stored {
            Ok(any) => match any.downcast_ref::<T>() {
                Some(value) => QueryState::Ready(value.clone()),
                // Keys map one-to-one to value types; reaching this arm means
                // two call sites disagree about a key's type.
                None => QueryState::Failed(QueryError {
                    kind: ServiceErrorKind::Rejected,
                    message: format!("cached value type mismatch for {key:?}"),
                }),
            },
            Err(err) => QueryState::Failed(err.clone()),
        }
    }

    /// Non-blocking read: `Pending` when the key is absent or its fetch is
    /// still in flight.
    pub fn peek<T>(&self, key: &CacheKey) -> QueryState<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let slot = match self.slots.lock().unwrap().get(key) {
            Some(slot) => slot.clone(),
            None => return QueryState::Pending,
        };
        match slot.get() {
            None => QueryState::Pending,
            Some(Ok(any)) => match any.downcast_ref::<T>() {
                Some(value) => QueryState::Ready(value.clone()),
                None => QueryState::Failed(QueryError {
                    kind: ServiceErrorKind::Rejected,
                    message: format!("cached value type mismatch for {key:?}"),
                }),
            },
            Some(Err(err)) => QueryState::Failed(err.clone()),
        }
    }

    /// Marks one key stale. Idempotent; readers already awaiting the old
    /// in-flight fetch still receive its result.
    pub fn invalidate(&self, key: &CacheKey) {
        debug!("cache invalidate: {key:?}");
        self.slots.lock().unwrap().remove(key);
    }

    /// Marks every key of one operation stale, regardless of arguments.
    pub fn invalidate_operation(&self, operation: Operation) {
        debug!("cache invalidate operation: {operation:?}");
        self.slots
            .lock()
            .unwrap()
            .retain(|key, _| key.operation() != operation);
    }

    /// Drops everything; used on logout.
    pub fn clear(&self) {
        self.slots.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn transient() -> ServiceError {
        ServiceError::Api {
            status: 503,
            code: "UNAVAILABLE".to_string(),
            message: "backend unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_second_read_hits_cache() {
        let cache = QueryCache::new();
        let fetches = AtomicUsize::new(0);

        for _ in 0..3 {
            let state = cache
                .get_or_fetch(CacheKey::JobPostings, || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ServiceError>(vec![1u64, 2, 3])
                })
                .await;
            assert_eq!(state.ready(), Some(vec![1, 2, 3]));
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_reads_share_one_fetch() {
        let cache = Arc::new(QueryCache::new());
        let fetches = Arc::new(AtomicUsize::new(0));

        let read = |cache: Arc<QueryCache>, fetches: Arc<AtomicUsize>| async move {
            cache
                .get_or_fetch(CacheKey::JobPostings, || async move {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok::<_, ServiceError>(42u64)
                })
                .await
        };

        let (a, b) = tokio::join!(
            read(cache.clone(), fetches.clone()),
            read(cache.clone(), fetches.clone())
        );

        assert_eq!(a.ready(), Some(42));
        assert_eq!(b.ready(), Some(42));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    /// One read that counts how often its fetch actually runs.
    async fn counted_read(cache: &QueryCache, fetches: &AtomicUsize) -> QueryState<usize> {
        cache
            .get_or_fetch(CacheKey::JobPostings, || async {
                Ok::<_, ServiceError>(fetches.fetch_add(1, Ordering::SeqCst))
            })
            .await
    }

    #[tokio::test]
    async fn test_invalidate_triggers_refetch() {
        let cache = QueryCache::new();
        let fetches = AtomicUsize::new(0);

        assert_eq!(counted_read(&cache, &fetches).await.ready(), Some(0));
        cache.invalidate(&CacheKey::JobPostings);
        assert_eq!(counted_read(&cache, &fetches).await.ready(), Some(1));
    }

    #[tokio::test]
    async fn test_double_invalidate_is_idempotent() {
        let cache = QueryCache::new();
        let fetches = AtomicUsize::new(0);

        counted_read(&cache, &fetches).await;
        cache.invalidate(&CacheKey::JobPostings);
        cache.invalidate(&CacheKey::JobPostings);
        counted_read(&cache, &fetches).await;
        counted_read(&cache, &fetches).await;

        // One fetch before invalidation, exactly one after.
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_stored_until_invalidated() {
        let cache = QueryCache::new();
        let fetches = AtomicUsize::new(0);

        let failing = cache
            .get_or_fetch(CacheKey::CallerUserProfile, || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Err::<u64, _>(transient())
            })
            .await;
        assert_eq!(failing.error().map(|e| e.kind), Some(ServiceErrorKind::Transient));

        // Re-render with a now-healthy fetch: the stored failure wins.
        let still_failing = cache
            .get_or_fetch(CacheKey::CallerUserProfile, || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok::<u64, ServiceError>(7)
            })
            .await;
        assert!(still_failing.error().is_some());
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        cache.invalidate(&CacheKey::CallerUserProfile);
        let recovered = cache
            .get_or_fetch(CacheKey::CallerUserProfile, || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok::<u64, ServiceError>(7)
            })
            .await;
        assert_eq!(recovered.ready(), Some(7));
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_operation_spares_other_operations() {
        let cache = QueryCache::new();

        let alice = Principal::from("alice");
        let bob = Principal::from("bob");
        for key in [
            CacheKey::UserApplications(alice.clone()),
            CacheKey::UserApplications(bob.clone()),
            CacheKey::JobPostings,
        ] {
            cache
                .get_or_fetch(key, || async { Ok::<_, ServiceError>(1u64) })
                .await;
        }

        cache.invalidate_operation(Operation::UserApplications);

        assert!(cache.peek::<u64>(&CacheKey::UserApplications(alice)).is_pending());
        assert!(cache.peek::<u64>(&CacheKey::UserApplications(bob)).is_pending());
        assert_eq!(cache.peek::<u64>(&CacheKey::JobPostings).ready(), Some(1));
    }

    #[tokio::test]
    async fn test_distinct_arguments_are_distinct_keys() {
        let cache = QueryCache::new();
        let fetches = AtomicUsize::new(0);

        for job_id in [3u64, 4, 3] {
            cache
                .get_or_fetch(CacheKey::JobApplications(job_id), || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ServiceError>(job_id)
                })
                .await;
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_peek_missing_key_is_pending() {
        let cache = QueryCache::new();
        assert!(cache.peek::<u64>(&CacheKey::CompiledCv).is_pending());
    }
}
