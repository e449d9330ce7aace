//! Feed sources and the fetcher abstraction.
//!
//! This module defines the [`FeedFetcher`] trait, the [`Source`]
//! configuration type and the values a fetch produces ([`Entry`],
//! [`SourceResult`]).  The production fetcher lives in [`http`].
//!
//! [`fetch_source`] is the isolation boundary: whatever goes wrong while
//! fetching one source is logged there and turned into an empty
//! [`SourceResult`], so callers never see a [`FeedError`].

mod entry;
mod error;
mod http;

pub use entry::{Entry, FetchStatus, SourceResult};
pub use error::FeedError;
pub use http::HttpFetcher;

use async_trait::async_trait;
use tracing::{error, info};

use crate::TARGET_FEED;

/// One configured feed: a unique display name and the URL to poll.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Source {
    pub name: String,
    pub endpoint: String,
}

impl Source {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Anything that can turn a feed endpoint into its top entries.
///
/// The aggregate cache only talks to this trait, so tests can count or
/// script fetches without a network.  Implementations must not touch cache
/// state and must return a fresh result on every call.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch and parse `endpoint`, returning at most five
    /// entries in document order.
    async fn fetch(&self, endpoint: &str) -> Result<Vec<Entry>, FeedError>;
}

/// Fetch one source, collapsing any failure into an empty result.
pub async fn fetch_source<F>(fetcher: &F, source: &Source) -> SourceResult
where
    F: FeedFetcher + ?Sized,
{
    info!(target: TARGET_FEED, "Fetching posts for {} from {}", source.name, source.endpoint);

    match fetcher.fetch(&source.endpoint).await {
        Ok(entries) => {
            info!(
                target: TARGET_FEED,
                "Found {} entries for {} at {}",
                entries.len(),
                source.name,
                source.endpoint
            );
            SourceResult::fetched(entries)
        }
        Err(err) => {
            let stage = if err.is_parse_error() { "parsing" } else { "fetching" };
            error!(target: TARGET_FEED, "Error {} {} ({}): {}", stage, source.name, source.endpoint, err);
            SourceResult::failed(&err)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
