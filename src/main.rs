//! topfeeds — the week's top posts from a fixed set of feeds, on one page.
//!
//! ## Architecture overview
//!
//! ```text
//!                 GET /          ┌──────────┐  get_aggregate()  ┌──────────┐
//!  browser ─────────────────────►│  app.rs  │ ─────────────────►│ cache.rs │
//!                                └──────────┘                   └──────────┘
//!                                     │ page()                       │ fetch_source() x N
//!                                     ▼                              ▼
//!                                ┌───────────┐                 ┌───────────┐
//!                                │ render.rs │                 │  source/  │ ── HTTP ──► feeds
//!                                └───────────┘                 └───────────┘
//!                                                                    ▲
//!                                ┌──────────┐  get_aggregate()       │
//!                                │ poll.rs  │ ──────► cache.rs ──────┘
//!                                └──────────┘
//! ```
//!
//! * **`source/`** — the `FeedFetcher` trait, the HTTP implementation and
//!   the per-source error boundary.
//! * **`cache`** — the single aggregate snapshot and its hourly refresh.
//! * **`poll`** — keeps the snapshot warm in the background.
//! * **`app`** — axum routes for the page and the health check.
//! * **`render`** — turns an aggregate into HTML.
//! * **`config`** / **`logging`** — startup plumbing.

mod app;
mod cache;
mod config;
mod logging;
mod poll;
mod render;
mod source;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};

use app::AppState;
use cache::AggregateCache;
use config::Config;
use source::HttpFetcher;

/// Log target for outbound feed requests.
pub const TARGET_FEED: &str = "feed";

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging();

    let config = Config::from_env()?;
    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;
    let cache = Arc::new(AggregateCache::new(fetcher));
    let sources = Arc::new(config.sources);

    // -- keep the cache warm -------------------------------------------------
    let period = cache
        .window()
        .to_std()
        .context("cache window must not be negative")?;
    let warmer = poll::spawn(Arc::clone(&cache), Arc::clone(&sources), period);

    // -- serve ---------------------------------------------------------------
    let state = AppState::new(cache, Arc::clone(&sources));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Serving {} sources on http://{}", sources.len(), addr);

    axum::serve(listener, app::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(warmer) = warmer {
        warmer.abort();
    }
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {}", err);
        // Without a signal handler, keep serving until killed.
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, shutting down");
}
