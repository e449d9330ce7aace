use reqwest::StatusCode;
use thiserror::Error;

/// Why a single source produced no entries.
///
/// `Timeout`, `Fetch` and `Status` are transport-level failures; `Parse`
/// means the body arrived but was not a feed.  None of these travel past
/// [`fetch_source`](super::fetch_source).
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {endpoint} timed out after {millis}ms")]
    Timeout { endpoint: String, millis: u128 },

    #[error("request to {endpoint} failed: {source}")]
    Fetch {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} responded with HTTP {status}")]
    Status { endpoint: String, status: StatusCode },

    #[error("could not parse feed: {reason}")]
    Parse { reason: String },
}

impl FeedError {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, FeedError::Parse { .. })
    }
}
