//! Time-windowed, whole-aggregate cache.
//!
//! One [`CacheSnapshot`] lives behind a single [`tokio::sync::Mutex`].  A
//! call to [`AggregateCache::get_aggregate`] holds that lock for the whole
//! check-refresh-replace sequence, so overlapping callers queue up behind a
//! refresh and then read the snapshot it produced.  A refresh never edits the
//! old aggregate; it builds a new one and swaps the `Arc`.
//!
//! The refresh itself runs in a spawned task that owns the lock guard.  If
//! the request that triggered it goes away, the refresh still completes and
//! warms the cache for whoever comes next.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use futures::future::join_all;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info};

use crate::source::{fetch_source, FeedFetcher, Source, SourceResult};

/// How long an aggregate is served before it is rebuilt.
pub const CACHE_DURATION: TimeDelta = TimeDelta::seconds(3600);

/// Top entries for every configured source, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    results: Vec<(String, SourceResult)>,
}

impl Aggregate {
    fn from_results(results: Vec<(String, SourceResult)>) -> Self {
        Self { results }
    }

    pub fn get(&self, name: &str) -> Option<&SourceResult> {
        self.results
            .iter()
            .find(|(source, _)| source == name)
            .map(|(_, result)| result)
    }

    /// `(source name, result)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceResult)> {
        self.results.iter().map(|(name, result)| (name.as_str(), result))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True when no source contributed a single entry.
    ///
    /// The page layer shows a "no content" message instead of an empty
    /// shell in this case.
    pub fn is_all_empty(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_empty())
    }

    fn covers(&self, sources: &[Source]) -> bool {
        self.results.len() == sources.len()
            && self
                .names()
                .zip(sources)
                .all(|(name, source)| name == source.name)
    }
}

/// The cached aggregate and when it was computed.
///
/// `refreshed_at == None` is the "never refreshed" state the process starts
/// in.
#[derive(Debug, Default)]
pub struct CacheSnapshot {
    aggregate: Arc<Aggregate>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl CacheSnapshot {
    fn is_fresh(&self, sources: &[Source], now: DateTime<Utc>, window: TimeDelta) -> bool {
        match self.refreshed_at {
            Some(at) => now - at < window && self.aggregate.covers(sources),
            None => false,
        }
    }

    fn replace(&mut self, aggregate: Arc<Aggregate>, now: DateTime<Utc>) {
        // A clock that steps backwards must not move the timestamp back.
        let refreshed_at = match self.refreshed_at {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *self = Self {
            aggregate,
            refreshed_at: Some(refreshed_at),
        };
    }
}

/// Owns the process-wide snapshot and the fetcher used to rebuild it.
pub struct AggregateCache<F> {
    fetcher: Arc<F>,
    window: TimeDelta,
    snapshot: Arc<Mutex<CacheSnapshot>>,
}

impl<F> AggregateCache<F>
where
    F: FeedFetcher + 'static,
{
    pub fn new(fetcher: F) -> Self {
        Self::with_window(fetcher, CACHE_DURATION)
    }

    pub fn with_window(fetcher: F, window: TimeDelta) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            window,
            snapshot: Arc::new(Mutex::new(CacheSnapshot::default())),
        }
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// When the current snapshot was built, or `None` before the first
    /// refresh.
    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.lock().await.refreshed_at
    }

    /// Return the aggregate for `sources` as of `now`.
    ///
    /// Serves the stored snapshot while it is younger than the window and
    /// was built for the same source list; otherwise fetches every source
    /// concurrently and replaces the snapshot.  Never fails: sources that
    /// could not be fetched appear with an empty result.
    pub async fn get_aggregate(&self, sources: &[Source], now: DateTime<Utc>) -> Arc<Aggregate> {
        let snapshot = Arc::clone(&self.snapshot).lock_owned().await;

        if snapshot.is_fresh(sources, now, self.window) {
            debug!("Using cached aggregate from {:?}", snapshot.refreshed_at);
            return Arc::clone(&snapshot.aggregate);
        }

        let fetcher = Arc::clone(&self.fetcher);
        let owned_sources = sources.to_vec();
        let task = tokio::spawn(refresh(fetcher, owned_sources, snapshot, now));

        match task.await {
            Ok(aggregate) => aggregate,
            Err(err) => {
                error!("Aggregate refresh task failed: {}", err);
                let reason = format!("refresh task failed: {err}");
                let results = sources
                    .iter()
                    .map(|s| (s.name.clone(), SourceResult::failed(&reason)))
                    .collect();
                Arc::new(Aggregate::from_results(results))
            }
        }
    }
}

async fn refresh<F>(
    fetcher: Arc<F>,
    sources: Vec<Source>,
    mut snapshot: OwnedMutexGuard<CacheSnapshot>,
    now: DateTime<Utc>,
) -> Arc<Aggregate>
where
    F: FeedFetcher + ?Sized,
{
    info!("Updating cache with fresh data from {} sources", sources.len());

    let results = join_all(sources.iter().map(|source| fetch_source(fetcher.as_ref(), source))).await;
    let aggregate = Arc::new(Aggregate::from_results(
        sources.into_iter().map(|s| s.name).zip(results).collect(),
    ));

    let failed = aggregate.iter().filter(|(_, r)| r.is_failed()).count();
    info!(
        "Cache refreshed: {} sources, {} failed, all empty: {}",
        aggregate.len(),
        failed,
        aggregate.is_all_empty()
    );

    snapshot.replace(Arc::clone(&aggregate), now);
    aggregate
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
