//! Debounced, latest-query-wins place search.
//!
//! Every [`SearchSession::search`] call supersedes the previous one: the
//! earlier lookup is aborted (whether still waiting out the debounce or
//! already in flight) and its caller receives [`SearchOutcome::Superseded`].
//! A result is only delivered if its query is still the latest when it
//! arrives.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::task::AbortHandle;

use crate::{GeocodeError, PlaceSearch, place::Place};

/// What a caller of [`SearchSession::search`] gets back.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Results for the latest query. Possibly empty.
    Places(Vec<Place>),
    /// A newer query (or [`SearchSession::cancel`]) replaced this one.
    Superseded,
    /// The lookup for the latest query failed.
    Failed(GeocodeError),
}

#[derive(Default)]
struct Pending {
    generation: u64,
    query: Option<String>,
    abort: Option<AbortHandle>,
}

/// One user's search box: at most one lookup is logically pending.
pub struct SearchSession {
    provider: Arc<dyn PlaceSearch>,
    debounce: Duration,
    pending: Arc<Mutex<Pending>>,
}

impl SearchSession {
    #[must_use]
    pub fn new(provider: Arc<dyn PlaceSearch>, debounce: Duration) -> Self {
        Self {
            provider,
            debounce,
            pending: Arc::new(Mutex::new(Pending::default())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Aborts whatever is pending. Its caller receives
    /// [`SearchOutcome::Superseded`].
    pub fn cancel(&self) {
        let mut pending = self.lock();
        pending.generation += 1;
        pending.query = None;
        if let Some(abort) = pending.abort.take() {
            abort.abort();
        }
    }

    /// The query currently pending, if any.
    #[must_use]
    pub fn latest_query(&self) -> Option<String> {
        self.lock().query.clone()
    }

    /// Waits out the debounce, then looks up `query`, unless a newer call
    /// arrives first.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.to_string();
        let provider = Arc::clone(&self.provider);
        let debounce = self.debounce;

        let (generation, handle) = {
            let mut pending = self.lock();
            if let Some(previous) = pending.abort.take() {
                log::trace!("aborting superseded lookup");
                previous.abort();
            }
            pending.generation += 1;
            pending.query = Some(query.clone());

            let lookup = query.clone();
            let handle = tokio::spawn(async move {
                tokio::time::sleep(debounce).await;
                provider.search(&lookup).await
            });
            pending.abort = Some(handle.abort_handle());
            (pending.generation, handle)
        };

        let result = match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => return SearchOutcome::Superseded,
            Err(e) => {
                return SearchOutcome::Failed(GeocodeError::Parse {
                    message: format!("search task failed: {e}"),
                });
            }
        };

        {
            let mut pending = self.lock();
            if pending.generation != generation || pending.query.as_deref() != Some(&query) {
                log::debug!("discarding stale results for {query:?}");
                return SearchOutcome::Superseded;
            }
            pending.abort = None;
        }

        match result {
            Ok(places) => SearchOutcome::Places(places),
            Err(e) => {
                log::warn!("place search for {query:?} failed: {e}");
                SearchOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSearch {
        calls: AtomicUsize,
        latency: Duration,
    }

    impl FakeSearch {
        fn new(latency: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                latency,
            })
        }
    }

    #[async_trait]
    impl PlaceSearch for FakeSearch {
        async fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            if query == "fail" {
                return Err(GeocodeError::RateLimited);
            }
            Ok(vec![Place {
                display_name: Some(query.to_string()),
                ..Default::default()
            }])
        }
    }

    fn names(outcome: SearchOutcome) -> Vec<String> {
        match outcome {
            SearchOutcome::Places(places) => places
                .into_iter()
                .filter_map(|p| p.display_name)
                .collect(),
            other => panic!("expected places, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn single_query_resolves_after_debounce() {
        let fake = FakeSearch::new(Duration::from_millis(10));
        let session = SearchSession::new(fake.clone(), Duration::from_millis(450));
        assert_eq!(names(session.search("bath").await), vec!["bath"]);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_within_debounce_only_sends_last_query() {
        let fake = FakeSearch::new(Duration::from_millis(10));
        let session = Arc::new(SearchSession::new(fake.clone(), Duration::from_millis(450)));

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.search("ba").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = session.search("bath").await;

        assert!(matches!(first.await.unwrap(), SearchOutcome::Superseded));
        assert_eq!(names(second), vec!["bath"]);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_query_aborts_in_flight_lookup() {
        let fake = FakeSearch::new(Duration::from_millis(1_000));
        let session = Arc::new(SearchSession::new(fake.clone(), Duration::from_millis(50)));

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.search("york").await })
        };
        // Past the debounce: the first lookup is on the wire.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);

        let second = session.search("yorkshire").await;
        assert!(matches!(first.await.unwrap(), SearchOutcome::Superseded));
        assert_eq!(names(second), vec!["yorkshire"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_lookup() {
        let fake = FakeSearch::new(Duration::from_millis(10));
        let session = Arc::new(SearchSession::new(fake.clone(), Duration::from_millis(450)));

        let pending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.search("leeds").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.latest_query().as_deref(), Some("leeds"));
        session.cancel();

        assert!(matches!(pending.await.unwrap(), SearchOutcome::Superseded));
        assert_eq!(session.latest_query(), None);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn provider_errors_are_reported() {
        let fake = FakeSearch::new(Duration::from_millis(10));
        let session = SearchSession::new(fake, Duration::from_millis(1));
        assert!(matches!(
            session.search("fail").await,
            SearchOutcome::Failed(GeocodeError::RateLimited)
        ));
    }
}
