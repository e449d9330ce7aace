//! The production feed fetcher.
//!
//! Issues one GET per call with a fixed browser `User-Agent` and a 10 second
//! timeout, then parses the body.  RSS 2.0 goes through the [`rss`] crate;
//! anything `rss` rejects (Atom, RSS 1.0/RDF, JSON Feed) gets a second
//! chance with [`feed_rs`].  Reddit serves Atom, so the fallback matters.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{Entry, FeedError, FeedFetcher};
use crate::TARGET_FEED;

/// Some hosts refuse obvious bot user agents, so we look like a browser.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Upper bound on a single fetch, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Entries kept per source.
pub const MAX_ENTRIES: usize = 5;

/// Fetches feeds over HTTP(S) with a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> reqwest::Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Parse a feed document into entries: the first [`MAX_ENTRIES`] items
    /// in document order, minus any that lack a title or link.
    ///
    /// Pure (no I/O) so the parsing rules can be tested on fixtures.
    pub fn parse_feed(body: &[u8]) -> Result<Vec<Entry>, FeedError> {
        match rss::Channel::read_from(body) {
            Ok(channel) => Ok(top_entries(
                channel.items().iter().map(|item| (item.title(), item.link())),
            )),
            Err(rss_err) => {
                debug!(target: TARGET_FEED, "Not RSS 2.0 ({}), trying feed-rs", rss_err);
                let feed = feed_rs::parser::parse(body).map_err(|err| FeedError::Parse {
                    reason: format!("not RSS ({rss_err}) nor Atom/JSON Feed ({err})"),
                })?;
                Ok(top_entries(feed.entries.iter().map(|entry| {
                    let title = entry.title.as_ref().map(|t| t.content.as_str());
                    let link = entry
                        .links
                        .iter()
                        .find(|l| l.rel.as_deref() == Some("alternate"))
                        .or_else(|| entry.links.first())
                        .map(|l| l.href.as_str());
                    (title, link)
                })))
            }
        }
    }

    fn request_error(&self, endpoint: &str, err: reqwest::Error) -> FeedError {
        if err.is_timeout() {
            FeedError::Timeout {
                endpoint: endpoint.to_string(),
                millis: self.timeout.as_millis(),
            }
        } else {
            FeedError::Fetch {
                endpoint: endpoint.to_string(),
                source: err,
            }
        }
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &str) -> Result<Vec<Entry>, FeedError> {
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|err| self.request_error(endpoint, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.request_error(endpoint, err))?;

        Self::parse_feed(&body)
    }
}

/// Cut to the first [`MAX_ENTRIES`] items, then drop those missing a title
/// or link.  A malformed item still uses up one of the slots.
fn top_entries<'a, I>(items: I) -> Vec<Entry>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    items
        .into_iter()
        .take(MAX_ENTRIES)
        .filter_map(|(title, link)| {
            let entry = Entry::from_parts(title, link);
            if entry.is_none() {
                debug!(target: TARGET_FEED, "Skipping entry without title or link: {:?}", title);
            }
            entry
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
