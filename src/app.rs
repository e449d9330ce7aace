//! HTTP surface: the aggregate page and a health check.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::cache::AggregateCache;
use crate::render;
use crate::source::{FeedFetcher, Source};

/// Shared handler state: the cache and the sources it aggregates.
pub struct AppState<F> {
    pub cache: Arc<AggregateCache<F>>,
    pub sources: Arc<Vec<Source>>,
}

impl<F> AppState<F> {
    pub fn new(cache: Arc<AggregateCache<F>>, sources: Arc<Vec<Source>>) -> Self {
        Self { cache, sources }
    }
}

// Derived Clone would require `F: Clone`.
impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            sources: Arc::clone(&self.sources),
        }
    }
}

pub fn router<F>(state: AppState<F>) -> Router
where
    F: FeedFetcher + 'static,
{
    Router::new()
        .route("/", get(index::<F>))
        .route("/health", get(health))
        .with_state(state)
}

/// Render the aggregate, or a "no content" page with 503 when every source
/// came back empty.
async fn index<F>(State(state): State<AppState<F>>) -> Response
where
    F: FeedFetcher + 'static,
{
    let aggregate = state.cache.get_aggregate(&state.sources, Utc::now()).await;

    if aggregate.is_all_empty() {
        warn!("No source returned any entries; serving no-content page");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Html(render::no_content_page()),
        )
            .into_response();
    }

    Html(render::page(&aggregate)).into_response()
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
