//! Background cache warming.
//!
//! A tokio task that asks the cache for the aggregate right after startup
//! and then once per period, so page views rarely pay for a refresh.  It
//! goes through [`AggregateCache::get_aggregate`] like any request, so a
//! still-fresh snapshot is left alone and the single snapshot lock is
//! respected.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::AggregateCache;
use crate::source::{FeedFetcher, Source};

/// Spawn the warmer.
///
/// Returns `None` for a zero period, since a cache that never holds an
/// aggregate has nothing to warm.  The task runs until it is aborted or the
/// runtime shuts down.
pub fn spawn<F>(
    cache: Arc<AggregateCache<F>>,
    sources: Arc<Vec<Source>>,
    period: Duration,
) -> Option<JoinHandle<()>>
where
    F: FeedFetcher + 'static,
{
    if period.is_zero() {
        debug!("Cache warming disabled");
        return None;
    }

    info!("Warming cache every {}s", period.as_secs());

    Some(tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let aggregate = cache.get_aggregate(&sources, Utc::now()).await;
            debug!(
                "Cache warm: {} sources, all empty: {}",
                aggregate.len(),
                aggregate.is_all_empty()
            );
        }
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Entry;
    use crate::test_support::StubFetcher;
    use chrono::TimeDelta;

    fn sources() -> Arc<Vec<Source>> {
        Arc::new(vec![Source::new("a", "http://feeds/a")])
    }

    fn stub() -> StubFetcher {
        StubFetcher::new().with_entries("http://feeds/a", vec![Entry::new("A", "http://a/1")])
    }

    #[tokio::test]
    async fn zero_period_is_disabled() {
        let cache = Arc::new(AggregateCache::new(stub()));
        assert!(spawn(cache, sources(), Duration::ZERO).is_none());
    }

    #[tokio::test]
    async fn warms_cache_on_startup() {
        let cache = Arc::new(AggregateCache::new(stub()));

        let handle = spawn(Arc::clone(&cache), sources(), Duration::from_secs(3600)).unwrap();
        time::sleep(Duration::from_millis(50)).await;

        assert!(cache.refreshed_at().await.is_some());
        handle.abort();
    }

    #[tokio::test]
    async fn refreshes_again_once_snapshot_is_stale() {
        let cache = Arc::new(AggregateCache::with_window(stub(), TimeDelta::zero()));

        let handle = spawn(Arc::clone(&cache), sources(), Duration::from_millis(10)).unwrap();
        time::sleep(Duration::from_millis(25)).await;
        let first = cache.refreshed_at().await.unwrap();
        time::sleep(Duration::from_millis(60)).await;
        let later = cache.refreshed_at().await.unwrap();

        assert!(later > first);
        handle.abort();
    }
}
