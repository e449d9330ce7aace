//! Shared fixtures for the inline test modules.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use reqwest::StatusCode;
use tokio::net::TcpListener;

use crate::source::{Entry, FeedError, FeedFetcher};

/// Serve `router` on an ephemeral loopback port for the rest of the test.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

pub fn rss_feed(items: &[(&str, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(title, link)| format!("<item><title>{title}</title><link>{link}</link></item>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Test Feed</title><link>https://example.com</link><description>test</description>{body}</channel></rss>"#
    )
}

pub fn atom_feed(items: &[(&str, &str)]) -> String {
    let body: String = items
        .iter()
        .enumerate()
        .map(|(i, (title, link))| {
            format!(
                r#"<entry><title>{title}</title><id>urn:test:{i}</id><updated>2024-01-01T00:00:00Z</updated><link href="{link}"/></entry>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><feed xmlns="http://www.w3.org/2005/Atom"><title>Test</title><id>urn:test</id><updated>2024-01-01T00:00:00Z</updated>{body}</feed>"#
    )
}

/// `("Post 1", "https://example.com/1")` .. `("Post n", ...)`.
pub fn numbered_items(n: usize) -> Vec<(String, String)> {
    (1..=n)
        .map(|i| (format!("Post {i}"), format!("https://example.com/{i}")))
        .collect()
}

enum Scripted {
    Entries(Vec<Entry>),
    Status(StatusCode),
    Parse,
}

/// A [`FeedFetcher`] with canned answers per endpoint and a call counter.
///
/// Unknown endpoints answer with HTTP 404.
#[derive(Default)]
pub struct StubFetcher {
    responses: HashMap<String, Scripted>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(mut self, endpoint: &str, entries: Vec<Entry>) -> Self {
        self.responses.insert(endpoint.to_string(), Scripted::Entries(entries));
        self
    }

    pub fn with_status(mut self, endpoint: &str, status: StatusCode) -> Self {
        self.responses.insert(endpoint.to_string(), Scripted::Status(status));
        self
    }

    pub fn with_parse_error(mut self, endpoint: &str) -> Self {
        self.responses.insert(endpoint.to_string(), Scripted::Parse);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedFetcher for StubFetcher {
    async fn fetch(&self, endpoint: &str) -> Result<Vec<Entry>, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.responses.get(endpoint) {
            Some(Scripted::Entries(entries)) => Ok(entries.clone()),
            Some(Scripted::Status(status)) => Err(FeedError::Status {
                endpoint: endpoint.to_string(),
                status: *status,
            }),
            Some(Scripted::Parse) => Err(FeedError::Parse {
                reason: "scripted parse failure".into(),
            }),
            None => Err(FeedError::Status {
                endpoint: endpoint.to_string(),
                status: StatusCode::NOT_FOUND,
            }),
        }
    }
}
